use linkrooms::db;
use linkrooms::error::Error;
use linkrooms::rooms::codec::RoomIdCodec;
use linkrooms::rooms::publish::{publish, NewLink, RoomMeta};
use linkrooms::rooms::view::load_room;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn fresh_pool() -> SqlitePool {
    // one connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

fn sample_links() -> Vec<NewLink> {
    vec![
        NewLink {
            url: "https://a.example".to_owned(),
            note: None,
        },
        NewLink {
            url: "https://b.example".to_owned(),
            note: Some("x".to_owned()),
        },
    ]
}

#[tokio::test]
async fn rejects_an_empty_room_without_writing() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let err = publish(&pool, &codec, RoomMeta::default(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyRoom));

    let (rooms,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM link_rooms")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((rooms, links), (0, 0));
}

#[tokio::test]
async fn publishes_a_room_with_its_links() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let meta = RoomMeta {
        name: Some("T".to_owned()),
        ..Default::default()
    };
    let public_id = publish(&pool, &codec, meta, &sample_links()).await.unwrap();
    assert_eq!(public_id, codec.encode(1).unwrap());

    let room = sqlx::query_as::<_, db::LinkRoomRow>("SELECT * FROM link_rooms")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(room.id, 1);
    assert_eq!(room.room_id, public_id);
    assert_eq!(room.room_name.as_deref(), Some("T"));
    assert!(!room.locked);
    assert_eq!(room.user_id, None);

    let links =
        sqlx::query_as::<_, db::LinkRow>("SELECT * FROM links WHERE link_room_id=? ORDER BY id")
            .bind(room.id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].url, "https://a.example");
    assert_eq!(links[0].note, None);
    assert_eq!(links[1].url, "https://b.example");
    assert_eq!(links[1].note.as_deref(), Some("x"));
}

#[tokio::test]
async fn stamps_the_owner_when_one_is_supplied() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let meta = RoomMeta {
        owner_id: Some("user-123".to_owned()),
        ..Default::default()
    };
    publish(&pool, &codec, meta, &sample_links()).await.unwrap();

    let (user_id,): (Option<String>,) = sqlx::query_as("SELECT user_id FROM link_rooms")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(user_id.as_deref(), Some("user-123"));
}

#[tokio::test]
async fn a_second_room_gets_the_next_id() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let first = publish(&pool, &codec, RoomMeta::default(), &sample_links())
        .await
        .unwrap();
    let second = publish(&pool, &codec, RoomMeta::default(), &sample_links())
        .await
        .unwrap();

    assert_eq!(first, codec.encode(1).unwrap());
    assert_eq!(second, codec.encode(2).unwrap());
    assert_ne!(first, second);
}

#[tokio::test]
async fn view_round_trips_a_published_room() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let meta = RoomMeta {
        name: Some("T".to_owned()),
        description: Some("about these links".to_owned()),
        ..Default::default()
    };
    let public_id = publish(&pool, &codec, meta, &sample_links()).await.unwrap();

    let view = load_room(&pool, &codec, &public_id).await.unwrap();
    assert_eq!(view.public_id, public_id);
    assert_eq!(view.name.as_deref(), Some("T"));
    assert_eq!(view.description.as_deref(), Some("about these links"));

    let got: Vec<(String, Option<String>)> = view
        .links
        .iter()
        .map(|link| (link.url.clone(), link.note.clone()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("https://a.example".to_owned(), None),
            ("https://b.example".to_owned(), Some("x".to_owned())),
        ]
    );
}

#[tokio::test]
async fn a_room_with_zero_links_is_viewable() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    // rooms cannot be published empty; an orphaned row can still exist
    let public_id = codec.encode(1).unwrap();
    sqlx::query("INSERT INTO link_rooms (id,room_id,locked) VALUES (1,?,0)")
        .bind(&public_id)
        .execute(&pool)
        .await
        .unwrap();

    let view = load_room(&pool, &codec, &public_id).await.unwrap();
    assert!(view.links.is_empty());
}

#[tokio::test]
async fn unknown_rooms_are_not_found() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();

    let err = load_room(&pool, &codec, &codec.encode(42).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RoomNotFound));
}

#[tokio::test]
async fn invalid_public_ids_fail_before_any_store_query() {
    let pool = fresh_pool().await;
    let codec = RoomIdCodec::new().unwrap();
    // a closed pool turns any query into a store error, so getting
    // RoomNotFound proves the shape check ran first
    pool.close().await;

    let err = load_room(&pool, &codec, "short").await.unwrap_err();
    assert!(matches!(err, Error::RoomNotFound));

    let err = load_room(&pool, &codec, "not valid id").await.unwrap_err();
    assert!(matches!(err, Error::RoomNotFound));
}
