use serde::de::DeserializeOwned;
use serde::Serialize;

/// Schema declaration for one document kind.
///
/// # Purpose
///
/// The store is generic over the documents it holds: a collection stores one
/// declared record type, tagged by a kind name, and never inspects document
/// shape at runtime. `Entity` is where an application declares that record
/// type together with the payloads used to create and partially update it.
///
/// # Characteristics
///
/// - `KIND` names the collection and tags its record set in the persistence
///   layer; two entity types must not share a kind name.
/// - `Draft` is the document minus its id; [`Entity::create`] attaches the
///   freshly assigned identifier during insertion.
/// - `Patch` carries partial updates. Every field of a patch is optional and
///   an omitted field means "no change"; there is no field-clearing
///   sentinel.
/// - Entities cross the persistence boundary through serde, so they must be
///   `Serialize + DeserializeOwned`.
///
/// # Usage
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct User { id: String, name: String, username: String }
///
/// struct NewUser { name: String, username: String }
///
/// #[derive(Default)]
/// struct UserPatch { name: Option<String>, username: Option<String> }
///
/// impl Entity for User {
///     const KIND: &'static str = "users";
///     type Draft = NewUser;
///     type Patch = UserPatch;
///
///     fn id(&self) -> &str { &self.id }
///
///     fn create(id: String, draft: NewUser) -> Self {
///         User { id, name: draft.name, username: draft.username }
///     }
///
///     fn apply(&mut self, patch: UserPatch) {
///         if let Some(name) = patch.name { self.name = name; }
///         if let Some(username) = patch.username { self.username = username; }
///     }
/// }
/// ```
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection kind name.
    const KIND: &'static str;

    /// Payload accepted by `insert`: the document minus its id.
    type Draft: Send;

    /// Payload accepted by `update`: a shallow field mask.
    type Patch: Send;

    /// The identifier assigned at insertion; immutable afterwards.
    fn id(&self) -> &str;

    /// Builds the full document from a freshly assigned identifier and a
    /// draft.
    fn create(id: String, draft: Self::Draft) -> Self;

    /// Shallow-merges `patch` into this document. Implementations must leave
    /// omitted fields untouched and must never change the id.
    fn apply(&mut self, patch: Self::Patch);
}
