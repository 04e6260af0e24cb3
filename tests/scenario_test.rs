mod common;

use common::setup_test_db;
use questions::{
    Config, Database, FullName, Like, Question, QuestionFollow, QuestionsError, User,
};
use tokio_test::assert_ok;

#[tokio::test]
async fn test_like_scenario() {
    let (db, _temp) = setup_test_db().await;

    let mut alice = User::new("Alice", "Smith");
    let alice_id = assert_ok!(alice.create(&db).await);
    let mut q1 = Question::new("Q1", "B1", alice_id);
    let q1_id = assert_ok!(q1.create(&db).await);
    assert_ok!(Like::new(q1_id, alice_id, 3).create(&db).await);

    assert_eq!(Like::num_likes_for_question_id(&db, q1_id).await.unwrap(), 3);
    assert_eq!(
        Like::likers_for_question_id(&db, q1_id).await.unwrap(),
        vec![FullName::new("Alice", "Smith")]
    );
    assert_eq!(q1.num_likes(&db).await.unwrap(), 3);
    assert_eq!(alice.liked_questions(&db).await.unwrap(), vec!["Q1"]);
}

#[tokio::test]
async fn test_most_followed_scenario() {
    let (db, _temp) = setup_test_db().await;

    let mut followers = Vec::new();
    for name in ["Ann", "Ben", "Cat"] {
        followers.push(User::new(name, "Follower").create(&db).await.unwrap());
    }
    let q1 = Question::new("Q1", "B1", followers[0])
        .create(&db)
        .await
        .unwrap();
    let q2 = Question::new("Q2", "B2", followers[0])
        .create(&db)
        .await
        .unwrap();

    for user in &followers {
        QuestionFollow::new(q1, *user).create(&db).await.unwrap();
    }
    QuestionFollow::new(q2, followers[2]).create(&db).await.unwrap();

    let ranking = QuestionFollow::most_followed_questions(&db, 2).await.unwrap();
    let titles: Vec<&str> = ranking.iter().map(|r| r.title.as_str()).collect();
    let totals: Vec<i64> = ranking.iter().map(|r| r.total).collect();
    assert_eq!(titles, vec!["Q1", "Q2"]);
    assert_eq!(totals, vec![3, 1]);

    let top = Question::most_followed(&db, 1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].question_id, q1);
}

#[tokio::test]
async fn test_rankings_never_exceed_limit_and_descend() {
    let (db, _temp) = setup_test_db().await;

    let mut users = Vec::new();
    for i in 0..5 {
        users.push(
            User::new(format!("U{}", i), "Ranker")
                .create(&db)
                .await
                .unwrap(),
        );
    }
    let mut questions = Vec::new();
    for i in 0..4 {
        questions.push(
            Question::new(format!("Q{}", i), "body", users[0])
                .create(&db)
                .await
                .unwrap(),
        );
    }
    // question i gets i + 1 followers and (i + 1) * 2 likes
    for (i, question) in questions.iter().enumerate() {
        for user in users.iter().take(i + 1) {
            QuestionFollow::new(*question, *user)
                .create(&db)
                .await
                .unwrap();
        }
        Like::new(*question, users[0], (i as i64 + 1) * 2)
            .create(&db)
            .await
            .unwrap();
    }

    for n in 0..6 {
        let followed = Question::most_followed(&db, n).await.unwrap();
        assert!(followed.len() <= n as usize);
        assert!(followed.windows(2).all(|w| w[0].total > w[1].total));

        let liked = Question::most_liked(&db, n).await.unwrap();
        assert!(liked.len() <= n as usize);
        assert!(liked.windows(2).all(|w| w[0].total > w[1].total));
    }

    let liked = Question::most_liked(&db, 2).await.unwrap();
    assert_eq!(liked[0].title, "Q3");
    assert_eq!(liked[0].total, 8);
}

#[tokio::test]
async fn test_round_trip_survives_reconnect() {
    let (db, temp) = setup_test_db().await;

    let mut user = User::new("Grace", "Hopper");
    let id = user.create(&db).await.unwrap();
    assert_eq!(db.last_insert_id().await, Some(id.as_i64()));
    drop(db);

    let config = Config {
        database_path: temp
            .path()
            .join("questions.db")
            .to_string_lossy()
            .to_string(),
        ..Config::default()
    };
    let reopened = Database::connect(&config).await.unwrap();
    assert_eq!(User::find_by_id(&reopened, id).await.unwrap(), user);
    assert_eq!(reopened.last_insert_id().await, None);
}

#[tokio::test]
async fn test_author_of_missing_user_is_not_found() {
    let (db, _temp) = setup_test_db().await;

    let author = User::new("Temp", "Author").create(&db).await.unwrap();
    let mut question = Question::new("Q", "B", author);
    question.create(&db).await.unwrap();

    // foreign keys off lets an external writer leave a dangling author id
    db.execute_batch("PRAGMA foreign_keys = OFF; DELETE FROM users")
        .await
        .unwrap();

    match question.author(&db).await {
        Err(QuestionsError::NotFound { entity, .. }) => assert_eq!(entity, "user"),
        other => panic!("Expected NotFound, got {:?}", other),
    }

    let err = User::find_by_name(&db, "Temp", "Author").await.unwrap_err();
    assert!(err.is_not_found());
}
