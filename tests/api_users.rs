//! Integration tests per gli endpoints degli utenti

mod common;

#[cfg(test)]
mod user_tests {
    use super::common::{
        ALICE_ID, BOB_ID, CHARLIE_ID, JWT_SECRET, bearer, create_test_admin_state, create_test_jwt,
        create_test_server, create_test_state,
    };
    use axum_test::http::HeaderName;
    use serde_json::json;
    use sqlx::SqlitePool;

    // ============================================================
    // Test per GET /auth/users/ e GET /auth/user/
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_list_users(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/auth/users/").await;

        response.assert_status_ok();
        let users: Vec<serde_json::Value> = response.json();
        let names: Vec<&str> = users.iter().map(|u| u["username"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
        assert!(users.iter().all(|u| u.get("password").is_none()));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_user_by_username_or_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let by_name = server
            .get("/auth/user/")
            .add_query_param("identifier", "alice")
            .await;
        by_name.assert_status_ok();
        by_name.assert_json(&json!({
            "id": ALICE_ID,
            "username": "alice",
            "photo_url": "https://example.com/alice.png"
        }));

        let by_id = server
            .get("/auth/user/")
            .add_query_param("identifier", BOB_ID)
            .await;
        by_id.assert_status_ok();
        let bob: serde_json::Value = by_id.json();
        assert_eq!(bob["username"], "bob");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_user_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/auth/user/")
            .add_query_param("identifier", "nobody")
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({"detail": "User not found"}));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_user_without_identifier(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/auth/user/").await;

        response.assert_status_bad_request();
        Ok(())
    }

    // ============================================================
    // Test per DELETE /auth/user/
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "chats", "messages")))]
    async fn test_delete_self(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let bob_token = create_test_jwt(BOB_ID, "bob", JWT_SECRET);
        let alice_token = create_test_jwt(ALICE_ID, "alice", JWT_SECRET);

        let response = server
            .delete("/auth/user/")
            .add_query_param("identifier", "bob")
            .add_header(HeaderName::from_static("authorization"), bearer(&bob_token))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "User bob deleted"}));

        // il token di un utente cancellato non vale più
        server
            .get("/chat/my_chats/1")
            .add_header(HeaderName::from_static("authorization"), bearer(&bob_token))
            .await
            .assert_status_unauthorized();

        server
            .get("/auth/user/")
            .add_query_param("identifier", BOB_ID)
            .await
            .assert_status_not_found();

        // i messaggi inviati da bob spariscono, quelli ricevuti restano senza destinatario
        let messages: Vec<serde_json::Value> = server
            .get("/messages/messages")
            .add_header(HeaderName::from_static("authorization"), bearer(&alice_token))
            .await
            .json();
        let ids: Vec<i64> = messages.iter().map(|m| m["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(messages[2]["receiver_id"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_delete_other_user_forbidden(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = create_test_jwt(BOB_ID, "bob", JWT_SECRET);

        let response = server
            .delete("/auth/user/")
            .add_query_param("identifier", CHARLIE_ID)
            .add_header(HeaderName::from_static("authorization"), bearer(&token))
            .await;

        response.assert_status_forbidden();

        server
            .get("/auth/user/")
            .add_query_param("identifier", "charlie")
            .await
            .assert_status_ok();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_admin_deletes_other_user(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_admin_state(pool));
        let token = create_test_jwt(ALICE_ID, "alice", JWT_SECRET);

        let response = server
            .delete("/auth/user/")
            .add_query_param("identifier", "charlie")
            .add_header(HeaderName::from_static("authorization"), bearer(&token))
            .await;

        response.assert_status_ok();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_delete_unknown_user(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = create_test_jwt(BOB_ID, "bob", JWT_SECRET);

        let response = server
            .delete("/auth/user/")
            .add_query_param("identifier", "nobody")
            .add_header(HeaderName::from_static("authorization"), bearer(&token))
            .await;

        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_delete_requires_token(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .delete("/auth/user/")
            .add_query_param("identifier", "bob")
            .await;

        response.assert_status_unauthorized();
        Ok(())
    }

    // ============================================================
    // Test per PATCH /auth/user/
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = create_test_jwt(BOB_ID, "bob", JWT_SECRET);

        let response = server
            .patch("/auth/user/")
            .add_header(HeaderName::from_static("authorization"), bearer(&token))
            .json(&json!({"photo_url": "https://example.com/bob.png"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "id": BOB_ID,
            "username": "bob",
            "photo_url": "https://example.com/bob.png"
        }));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile_username_taken(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let token = create_test_jwt(BOB_ID, "bob", JWT_SECRET);

        let response = server
            .patch("/auth/user/")
            .add_header(HeaderName::from_static("authorization"), bearer(&token))
            .json(&json!({"username": "alice"}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"detail": "Username already in use"}));
        Ok(())
    }
}
