use super::handlers::{auth, comments, home, posts};
use crate::state::AppState;
use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([HeaderName::from_static("x-requested-with")]);

    if allowed_origins == "*" {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
        base.allow_origin(Any)
    } else {
        tracing::info!("CORS enabled for origins: {:?}", origins);
        base.allow_origin(origins)
    }
}

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/register", post(auth::register))
        .route("/signin", post(auth::sign_in))
        .route("/signout", post(auth::sign_out))
        .route("/submit_post", post(posts::submit_post))
        .route("/posts/:post_id/delete", post(posts::delete_post))
        .route("/posts/:post_id/vote", post(posts::vote_post))
        .route(
            "/posts/:post_id/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            get(comments::show_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id/reply",
            post(comments::reply_to_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id/delete",
            post(comments::delete_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id/vote",
            post(comments::vote_comment),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKey;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use domain::{Board, Submission};
    use std::sync::Arc;
    use storage::{MemoryStore, SnapshotStore};
    use tower::ServiceExt;

    const TEST_COST: u32 = 4;

    fn setup() -> (Router, MemoryStore) {
        let store = MemoryStore::default();
        let state = AppState::new(Arc::new(store.clone()), SessionKey::new("test"), TEST_COST);
        (build_router(state, "*"), store)
    }

    fn session_cookie(res: &Response) -> String {
        let raw = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("response sets the session cookie")
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::get(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.body(Body::empty()).unwrap()
    }

    async fn json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, name: &str) -> String {
        let res = app
            .clone()
            .oneshot(form("/register", &format!("user_id={name}&password=password"), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        session_cookie(&res)
    }

    async fn only_post(store: &MemoryStore) -> Board {
        let board = store.load_board().await.unwrap();
        assert_eq!(board.posts().len(), 1);
        board
    }

    #[tokio::test]
    async fn test_register_then_home_shows_flash() {
        let (app, _) = setup();
        let cookie = register(&app, "Ryan").await;

        let res = app.clone().oneshot(get_req("/", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json(res).await;
        assert_eq!(body["user"], "Ryan");
        assert_eq!(body["flash"]["kind"], "success");
        assert_eq!(body["flash"]["message"], "Thanks for registering, Ryan");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate() {
        let (app, _) = setup();
        register(&app, "User").await;

        let res = app
            .clone()
            .oneshot(form("/register", "user_id=User&password=password", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(res).await["error"], "Sorry, that username is already taken");
    }

    #[tokio::test]
    async fn test_sign_in_messages() {
        let (app, _) = setup();
        register(&app, "User").await;

        let res = app
            .clone()
            .oneshot(form("/signin", "user_id=User&password=wrong", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(res).await["error"], "Invalid password.  Please try again");

        let res = app
            .clone()
            .oneshot(form("/signin", "user_id=Another+User&password=password", None))
            .await
            .unwrap();
        assert_eq!(json(res).await["error"], "Sorry, we don't recognize that username");

        let res = app
            .clone()
            .oneshot(form("/signin", "user_id=User&password=password", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_protected_route_requires_sign_in() {
        let (app, store) = setup();

        let res = app
            .clone()
            .oneshot(form("/submit_post", "title=T&link=http://x.org", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
        let cookie = session_cookie(&res);

        let body = json(app.clone().oneshot(get_req("/", Some(&cookie))).await.unwrap()).await;
        assert_eq!(body["flash"]["kind"], "error");
        assert_eq!(body["flash"]["message"], "Must be signed in to perform this action");

        let mut xhr = form("/posts/abc/vote", "choice=upvote", None);
        xhr.headers_mut()
            .insert("X-Requested-With", "XMLHttpRequest".parse().unwrap());
        let res = app.clone().oneshot(xhr).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        assert!(store.load_board().await.unwrap().posts().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_signed_out() {
        let (app, _) = setup();
        let cookie = register(&app, "User").await;
        let forged = format!("{}x", cookie);

        let body = json(app.clone().oneshot(get_req("/", Some(&forged))).await.unwrap()).await;
        assert!(body["user"].is_null());
        assert!(body["flash"].is_null());
    }

    #[tokio::test]
    async fn test_post_comment_vote_delete_flow() {
        let (app, store) = setup();
        let cookie = register(&app, "User").await;

        let res = app
            .clone()
            .oneshot(form(
                "/submit_post",
                "title=Real+Reddit&link=https%3A%2F%2Fwww.reddit.com%2F",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let post_id = only_post(&store).await.posts()[0].id().to_string();

        let res = app
            .clone()
            .oneshot(form(
                &format!("/posts/{post_id}/comments"),
                "text=Haha",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()[header::LOCATION],
            format!("/posts/{post_id}/comments").as_str()
        );
        let comment_id = only_post(&store).await.posts()[0].replies()[0]
            .id()
            .to_string();

        let res = app
            .clone()
            .oneshot(form(
                &format!("/posts/{post_id}/comments/{comment_id}/reply"),
                "text=Nested",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let mut vote = form(
            &format!("/posts/{post_id}/comments/{comment_id}/vote"),
            "choice=upvote",
            Some(&cookie),
        );
        vote.headers_mut()
            .insert("X-Requested-With", "XMLHttpRequest".parse().unwrap());
        let res = app.clone().oneshot(vote).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .clone()
            .oneshot(get_req(&format!("/posts/{post_id}/comments"), Some(&cookie)))
            .await
            .unwrap();
        let body = json(res).await;
        assert_eq!(body["post"]["title"], "Real Reddit");
        assert_eq!(body["post"]["reply_count"], 2);
        assert_eq!(body["comments"][0]["text"], "Haha");
        assert_eq!(body["comments"][0]["score"], 1);
        assert_eq!(body["comments"][0]["upvoted"], true);
        assert_eq!(body["comments"][1]["depth"], 1);
        assert_eq!(body["comments"][1]["text"], "Nested");

        let res = app
            .clone()
            .oneshot(form(&format!("/posts/{post_id}/delete"), "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let body = json(app.clone().oneshot(get_req("/", Some(&cookie))).await.unwrap()).await;
        assert_eq!(body["flash"]["message"], "Post successfully deleted!");
        assert_eq!(body["posts"][0]["deleted"], true);
        assert!(body["posts"][0]["title"].is_null());
        assert_eq!(body["posts"][0]["reply_count"], 2);
    }

    #[tokio::test]
    async fn test_errors_do_not_mutate() {
        let (app, store) = setup();
        let owner = register(&app, "Owner").await;
        let other = register(&app, "Other").await;

        app.clone()
            .oneshot(form(
                "/submit_post",
                "title=Mine&link=http://mine.example",
                Some(&owner),
            ))
            .await
            .unwrap();
        let post_id = only_post(&store).await.posts()[0].id().to_string();

        let res = app
            .clone()
            .oneshot(form("/submit_post", "title=Bad&link=a+link", Some(&owner)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(res).await["error"], "Link must be an http address");

        let res = app
            .clone()
            .oneshot(form(&format!("/posts/{post_id}/delete"), "", Some(&other)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .clone()
            .oneshot(form("/posts/nope/comments", "text=hi", Some(&owner)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(res).await["error"], "Sorry, that post doesn't exist");

        let res = app
            .clone()
            .oneshot(form(
                &format!("/posts/{post_id}/comments/abc/vote"),
                "choice=upvote",
                Some(&owner),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app
            .clone()
            .oneshot(form(&format!("/posts/{post_id}/vote"), "choice=sideways", Some(&owner)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let board = only_post(&store).await;
        let post = &board.posts()[0];
        assert!(!post.is_deleted());
        assert_eq!(post.score(), 0);
        assert!(post.replies().is_empty());
    }
}
