//! End-to-end HTTP flows over the in-memory adapters: registration, login,
//! ranking submission and the demand report.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use labrank::Trace;
use labrank::inbound::http::configure;
use labrank::test_support::InMemoryBackend;

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<Cookie<'static>>,
    location: Option<String>,
}

async fn send<S, B>(app: &S, request: actix_http::Request) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request).await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        cookie,
        location,
    }
}

fn post_json(path: &str, body: &Value, cookie: Option<&Cookie<'static>>) -> actix_http::Request {
    let mut request = test::TestRequest::post().uri(path).set_json(body);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    request.to_request()
}

fn get(path: &str, cookie: Option<&Cookie<'static>>) -> actix_http::Request {
    let mut request = test::TestRequest::get().uri(path);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    request.to_request()
}

fn credentials(student_id: &str, password: &str) -> Value {
    json!({"studentId": student_id, "password": password})
}

#[fixture]
fn backend() -> InMemoryBackend {
    InMemoryBackend::with_labs(&["A", "B", "C"])
}

macro_rules! flow_app {
    ($backend:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($backend.http_state()))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

macro_rules! signed_in {
    ($app:expr, $student:expr, $password:expr) => {{
        let registered = send(
            &$app,
            post_json("/api/v1/register", &credentials($student, $password), None),
        )
        .await;
        assert_eq!(registered.status, StatusCode::CREATED);
        let login = send(
            &$app,
            post_json("/api/v1/login", &credentials($student, $password), None),
        )
        .await;
        assert_eq!(login.status, StatusCode::OK);
        login.cookie.expect("session cookie after login")
    }};
}

fn report_counts(body: &Value) -> Vec<(String, u64, u64, u64)> {
    body["report"]
        .as_array()
        .expect("report rows")
        .iter()
        .map(|row| {
            (
                row["name"].as_str().expect("name").to_owned(),
                row["first"].as_u64().expect("first"),
                row["second"].as_u64().expect("second"),
                row["third"].as_u64().expect("third"),
            )
        })
        .collect()
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_conflicts_and_keeps_the_original_password(
    backend: InMemoryBackend,
) {
    let app = flow_app!(backend);

    let first = send(
        &app,
        post_json("/api/v1/register", &credentials("s1", "original"), None),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({"studentId": "s1"}));

    let second = send(
        &app,
        post_json("/api/v1/register", &credentials("s1", "replacement"), None),
    )
    .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["code"], "conflict");

    let with_new = send(
        &app,
        post_json("/api/v1/login", &credentials("s1", "replacement"), None),
    )
    .await;
    assert_eq!(with_new.status, StatusCode::UNAUTHORIZED);

    let with_original = send(
        &app,
        post_json("/api/v1/login", &credentials("s1", "original"), None),
    )
    .await;
    assert_eq!(with_original.status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_and_unknown_student_look_the_same(backend: InMemoryBackend) {
    let app = flow_app!(backend);
    let _cookie = signed_in!(app, "s1", "secret");

    let wrong_password = send(
        &app,
        post_json("/api/v1/login", &credentials("s1", "guess"), None),
    )
    .await;
    let unknown = send(
        &app,
        post_json("/api/v1/login", &credentials("nobody", "guess"), None),
    )
    .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["code"], unknown.body["code"]);
    assert_eq!(wrong_password.body["message"], unknown.body["message"]);
    assert!(wrong_password.cookie.is_none());
}

#[rstest]
#[actix_web::test]
async fn blank_registration_fields_are_rejected(backend: InMemoryBackend) {
    let app = flow_app!(backend);

    let reply = send(
        &app,
        post_json("/api/v1/register", &credentials("   ", "pw"), None),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], "studentId");
    assert_eq!(reply.body["details"]["code"], "empty_student_id");
}

#[rstest]
#[actix_web::test]
async fn protected_routes_point_anonymous_callers_at_login(backend: InMemoryBackend) {
    let app = flow_app!(backend);

    let dashboard = send(&app, get("/api/v1/dashboard", None)).await;
    let submit = send(
        &app,
        post_json(
            "/api/v1/dashboard",
            &json!({"choice1": 1, "choice2": 2, "choice3": 3}),
            None,
        ),
    )
    .await;

    for reply in [dashboard, submit] {
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["details"]["redirect"], "/login");
    }
    assert_eq!(backend.choices.submitted_students(), 0);
}

#[rstest]
#[actix_web::test]
async fn two_students_produce_the_documented_report(backend: InMemoryBackend) {
    let app = flow_app!(backend);
    let u1 = signed_in!(app, "u1", "pw1");
    let u2 = signed_in!(app, "u2", "pw2");

    let first = send(
        &app,
        post_json(
            "/api/v1/dashboard",
            &json!({"choice1": "1", "choice2": "2", "choice3": "3"}),
            Some(&u1),
        ),
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, json!({"choice1": 1, "choice2": 2, "choice3": 3}));

    let second = send(
        &app,
        post_json(
            "/api/v1/dashboard",
            &json!({"choice1": 2, "choice2": 1, "choice3": 3}),
            Some(&u2),
        ),
    )
    .await;
    assert_eq!(second.status, StatusCode::OK);

    let dashboard = send(&app, get("/api/v1/dashboard", Some(&u1))).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(
        dashboard.body["choices"],
        json!({"choice1": 1, "choice2": 2, "choice3": 3})
    );
    assert_eq!(
        report_counts(&dashboard.body),
        vec![
            ("A".to_owned(), 1, 1, 0),
            ("B".to_owned(), 1, 1, 0),
            ("C".to_owned(), 0, 0, 2),
        ]
    );
    assert_eq!(
        dashboard.body["totals"],
        json!({"first": 2, "second": 2, "third": 2})
    );
}

#[rstest]
#[actix_web::test]
async fn resubmission_replaces_the_previous_ranking(backend: InMemoryBackend) {
    let app = flow_app!(backend);
    let cookie = signed_in!(app, "s1", "pw");

    for body in [
        json!({"choice1": 1, "choice2": 2, "choice3": 3}),
        json!({"choice1": 3, "choice2": 1, "choice3": 2}),
    ] {
        let reply = send(&app, post_json("/api/v1/dashboard", &body, Some(&cookie))).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let dashboard = send(&app, get("/api/v1/dashboard", Some(&cookie))).await;
    assert_eq!(
        dashboard.body["choices"],
        json!({"choice1": 3, "choice2": 1, "choice3": 2})
    );
    assert_eq!(
        report_counts(&dashboard.body),
        vec![
            ("A".to_owned(), 0, 1, 0),
            ("B".to_owned(), 0, 0, 1),
            ("C".to_owned(), 1, 0, 0),
        ]
    );
}

#[rstest]
#[case(json!({"choice1": 1, "choice2": 1, "choice3": 2}))]
#[case(json!({"choice1": 1, "choice2": 2}))]
#[case(json!({"choice1": 1, "choice2": "two", "choice3": 3}))]
#[case(json!({"choice1": 1, "choice2": 2, "choice3": 99}))]
#[actix_web::test]
async fn invalid_submissions_leave_the_stored_ranking_alone(
    backend: InMemoryBackend,
    #[case] invalid: Value,
) {
    let app = flow_app!(backend);
    let cookie = signed_in!(app, "s1", "pw");
    let valid = json!({"choice1": 3, "choice2": 2, "choice3": 1});
    let stored = send(&app, post_json("/api/v1/dashboard", &valid, Some(&cookie))).await;
    assert_eq!(stored.status, StatusCode::OK);

    let rejected = send(&app, post_json("/api/v1/dashboard", &invalid, Some(&cookie))).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["code"], "invalid_request");

    let dashboard = send(&app, get("/api/v1/dashboard", Some(&cookie))).await;
    assert_eq!(dashboard.body["choices"], valid);
}

#[rstest]
#[actix_web::test]
async fn landing_follows_the_student_through_the_flow(backend: InMemoryBackend) {
    let app = flow_app!(backend);

    let anonymous = send(&app, get("/", None)).await;
    assert_eq!(anonymous.status, StatusCode::SEE_OTHER);
    assert_eq!(anonymous.location.as_deref(), Some("/login"));

    let cookie = signed_in!(app, "s1", "pw");
    let before = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(before.location.as_deref(), Some("/register-choices"));

    let submitted = send(
        &app,
        post_json(
            "/api/v1/dashboard",
            &json!({"choice1": 1, "choice2": 2, "choice3": 3}),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(submitted.status, StatusCode::OK);

    let after = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(after.location.as_deref(), Some("/dashboard"));
}

#[rstest]
#[actix_web::test]
async fn logout_hands_back_a_removal_cookie(backend: InMemoryBackend) {
    let app = flow_app!(backend);
    let cookie = signed_in!(app, "s1", "pw");

    let logout = send(
        &app,
        post_json("/api/v1/logout", &json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    let cleared = logout.cookie.expect("removal cookie");
    assert!(cleared.value().is_empty());

    let dashboard = send(&app, get("/api/v1/dashboard", Some(&cleared))).await;
    assert_eq!(dashboard.status, StatusCode::UNAUTHORIZED);

    // Cookie sessions keep no server-side record, so a copy taken before
    // logout stays valid until its TTL runs out.
    let replayed = send(&app, get("/api/v1/dashboard", Some(&cookie))).await;
    assert_eq!(replayed.status, StatusCode::OK);
}
