//! Seeds a fresh database with demo users and posts.

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use rand::Rng;
use shutter::store::JournalStore;
use shutter::Shutter;
use shutter_server::auth::hash_password;
use shutter_server::model::{Database, NewPost, NewUser};
use shutter_server::settings::Settings;

struct SeedUser {
    name: &'static str,
    profile_photo: &'static str,
    username: &'static str,
    password: &'static str,
}

struct SeedPost {
    photo: &'static str,
    caption: &'static str,
    created_at: &'static str,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        name: "Julie",
        profile_photo: "https://user-images.githubusercontent.com/369384/192453593-560d6ae3-0e11-44dd-90f5-f0b87a8b4ce9.jpg",
        username: "julie",
        password: "123",
    },
    SeedUser {
        name: "Kevin",
        profile_photo: "https://user-images.githubusercontent.com/369384/192453596-ea862041-f1de-4e71-880b-2573c1f47ce8.jpg",
        username: "kevin",
        password: "123",
    },
    SeedUser {
        name: "Liza",
        profile_photo: "https://user-images.githubusercontent.com/369384/192453597-cc7bff73-b838-4db6-a137-6706805195bf.jpg",
        username: "liza",
        password: "123",
    },
    SeedUser {
        name: "Zach",
        profile_photo: "https://user-images.githubusercontent.com/369384/192453599-affcb8f9-b475-40c1-94dc-2f7d23f820c6.jpg",
        username: "zach",
        password: "123",
    },
];

const POSTS: &[SeedPost] = &[
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451321-c511a886-1ecd-42dd-9afc-a1f2ae86d75b.jpeg",
        caption: "Turnips are delicious",
        created_at: "2022-09-24T00:14:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451325-5bbd11b9-2ed9-4166-9987-ac52abfeb637.jpeg",
        caption: "Arctic Penguins",
        created_at: "2022-09-24T03:23:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451326-beed0b86-28f2-4979-8250-d304b57e7801.jpeg",
        caption: "Enjoy life for it's beauty",
        created_at: "2022-09-25T12:32:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451328-6c4b2bd5-3443-44b7-ac55-2b7dfa0176de.jpeg",
        caption: "Farm life",
        created_at: "2022-09-25T14:41:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451331-12e2bf6c-d4d5-4df3-b445-75d986ae86a1.jpeg",
        caption: "Summer breeze",
        created_at: "2022-09-25T19:59:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451334-1ee81ecb-cab0-47b9-a601-0fbfc0fd3fdd.jpeg",
        caption: "Arizona cactus",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451337-6b988d5f-af92-48cc-9c94-4e3f7a435f1c.jpeg",
        caption: "No better time to be alive",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451339-f66ff3ae-eda6-4715-8896-7e021904a283.jpeg",
        caption: "Stay frosty",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451342-6095f8d0-3138-4b5a-8e94-aede107f18a9.jpeg",
        caption: "Enjoy life's subtle moments",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451345-81ab917e-f1e2-4b61-8cf5-9d685dacab75.jpeg",
        caption: "It's colder at night than outside",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451346-acabcb5f-7f06-4113-bc54-adba78932a0b.jpeg",
        caption: "Wyoming is great",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451348-dac99392-7620-4369-b653-4b894abc154e.jpeg",
        caption: "Stay hydrated",
        created_at: "2022-09-26T01:12:00.000Z",
    },
    SeedPost {
        photo: "https://user-images.githubusercontent.com/369384/192451350-2c2d995e-9fce-45a0-a65a-9d5fa412702a.jpeg",
        caption: "Turtle paradise",
        created_at: "2022-09-26T01:12:00.000Z",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colog::init();

    let settings = Settings::new().context("failed to load settings")?;
    let store = JournalStore::open(&settings.storage.data_dir).await?;
    let db = Shutter::builder().with_store(store).open().await?;
    let database = Database::open(&db).await?;

    let mut inserted = Vec::new();
    for seed in USERS {
        let user = database
            .users
            .insert(NewUser {
                name: seed.name.to_string(),
                profile_photo: seed.profile_photo.to_string(),
                username: seed.username.to_string(),
                password_hash: hash_password(seed.password)?,
            })
            .await?;
        log::info!("Inserted user: {}", user.username);
        inserted.push(user);
    }

    let mut rng = rand::thread_rng();
    for seed in POSTS {
        let author = &inserted[rng.gen_range(0..inserted.len())];
        let created_at: DateTime<Utc> = seed
            .created_at
            .parse()
            .with_context(|| format!("bad seed timestamp {}", seed.created_at))?;
        let post = database
            .posts
            .insert(NewPost {
                author: author.id.clone(),
                photo: seed.photo.to_string(),
                caption: seed.caption.to_string(),
                liked_by: Vec::new(),
                comments: Vec::new(),
                created_at,
            })
            .await?;
        log::info!("Inserted post: {}", post.id);
    }

    db.close().await?;
    log::info!("Done.");
    Ok(())
}
