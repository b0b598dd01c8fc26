//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP using ureq, first through the bare
//! build/parse pairs and then through the repository and screen sessions.

use std::sync::Arc;
use std::time::Duration;

use lostfound_core::{
    ApiError, AsyncResult, ChangeTracking, CreateLostFound, DetailEffect, DetailEvent, DetailSession,
    HttpMethod, HttpRequest, HttpResponse, ListFilter, ListSession, LoginRequest, Looper,
    LostFoundClient, LostFoundRepository, RegisterRequest, ScreenResult, Transport, UpdateLostFound,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = req.path.as_str();
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &req.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), &req.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), &req.headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            lostfound_mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn sign_in(client: &mut LostFoundClient, transport: &UreqTransport, email: &str) {
    let register = RegisterRequest {
        name: "Tester".to_string(),
        email: email.to_string(),
        password: "pw".to_string(),
    };
    client
        .parse_register(transport.execute(client.build_register(&register)).unwrap())
        .unwrap();
    let login = LoginRequest {
        email: email.to_string(),
        password: "pw".to_string(),
    };
    let token = client
        .parse_login(transport.execute(client.build_login(&login)).unwrap())
        .unwrap();
    client.set_token(Some(token));
}

#[test]
fn crud_lifecycle() {
    let transport = UreqTransport::new();
    let mut client = LostFoundClient::new(&start_server());

    // Anonymous requests are refused.
    let err = client
        .parse_list_lost_founds(transport.execute(client.build_list_lost_founds(&ListFilter::default())).unwrap())
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }), "got {err:?}");

    sign_in(&mut client, &transport, "ana@example.com");
    let me = client.parse_me(transport.execute(client.build_me()).unwrap()).unwrap();
    assert_eq!(me.email, "ana@example.com");

    // List is empty.
    let items = client
        .parse_list_lost_founds(transport.execute(client.build_list_lost_founds(&ListFilter::default())).unwrap())
        .unwrap();
    assert!(items.is_empty());

    // Create.
    let input = CreateLostFound {
        title: "Black wallet & cards".to_string(),
        description: "Left in room 204".to_string(),
        status: Some("lost".to_string()),
    };
    let id = client
        .parse_create_lost_found(transport.execute(client.build_create_lost_found(&input)).unwrap())
        .unwrap();

    // Get round-trips the fields.
    let item = client
        .parse_get_lost_found(transport.execute(client.build_get_lost_found(id)).unwrap())
        .unwrap();
    assert_eq!(item.title, "Black wallet & cards");
    assert_eq!(item.status, "lost");
    assert!(!item.completed());
    assert_eq!(item.user_id, Some(me.id));

    // Update completion through the query string.
    let update = UpdateLostFound::completion(&item.to_item(), true);
    client
        .parse_update_lost_found(transport.execute(client.build_update_lost_found(id, &update)).unwrap())
        .unwrap();
    let done = ListFilter {
        is_completed: Some(true),
        status: None,
    };
    let items = client
        .parse_list_lost_founds(transport.execute(client.build_list_lost_founds(&done)).unwrap())
        .unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].completed());

    // Validation errors carry the field.
    let blank = UpdateLostFound {
        title: " ".to_string(),
        description: "x".to_string(),
        status: None,
        is_completed: None,
    };
    let err = client
        .parse_update_lost_found(transport.execute(client.build_update_lost_found(id, &blank)).unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Validation {
            status: 400,
            field: Some("title".to_string()),
            message: "Title is required".to_string(),
        }
    );

    // Delete, then it is gone.
    client
        .parse_delete_lost_found(transport.execute(client.build_delete_lost_found(id)).unwrap())
        .unwrap();
    let err = client
        .parse_get_lost_found(transport.execute(client.build_get_lost_found(id)).unwrap())
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound("Lost-found not found".to_string()));
    assert_eq!(err.http_status(), Some(404));
}

#[test]
fn unreachable_server_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = LostFoundClient::new(&format!("http://127.0.0.1:{port}"));
    let err = UreqTransport::new().execute(client.build_me()).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

fn pump(looper: &Looper) {
    assert!(looper.run_next(Duration::from_secs(10)), "no result delivered");
}

#[test]
fn screens_against_live_server() {
    let looper = Looper::new();
    let repo = LostFoundRepository::new(
        LostFoundClient::new(&start_server()),
        Arc::new(UreqTransport::new()),
        looper.handle(),
    );

    let registered = repo.register(RegisterRequest {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "pw".to_string(),
    });
    pump(&looper);
    assert_eq!(registered.value(), Some(AsyncResult::Success(())));

    let login = repo.login(LoginRequest {
        email: "ana@example.com".to_string(),
        password: "pw".to_string(),
    });
    pump(&looper);
    assert!(login.value().is_some_and(|r| r.success().is_some()));
    assert!(repo.is_logged_in());

    let created = repo.create_lost_found(CreateLostFound {
        title: "Wallet".to_string(),
        description: "Brown".to_string(),
        status: Some("found".to_string()),
    });
    pump(&looper);
    let id = *created.value().unwrap().success().unwrap();

    let mut list = ListSession::new(repo.clone(), ListFilter::default());
    list.refresh();
    pump(&looper);
    assert!(list.process().is_empty());
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].is_completed, 0);

    // Open the detail screen, mark it resolved, go back.
    let (mut detail, effects) = DetailSession::open(repo.clone(), id, ChangeTracking::EntrySnapshot);
    assert!(effects.is_empty());
    pump(&looper);
    assert!(detail.process().is_empty());
    let view = detail.screen().view().unwrap();
    assert_eq!(view.item.title, "Wallet");
    assert_eq!(view.status.text, "Found");

    assert!(detail.dispatch(DetailEvent::ToggleCompleted(true)).is_empty());
    pump(&looper);
    assert_eq!(
        detail.process(),
        vec![DetailEffect::Toast("Marked as resolved: Wallet".to_string())]
    );
    let back = detail.dispatch(DetailEvent::BackPressed);
    assert_eq!(back, vec![DetailEffect::Finish(ScreenResult::with_change(true))]);
    drop(detail);

    assert!(list.on_child_result(ScreenResult::with_change(true)));
    pump(&looper);
    list.process();
    assert_eq!(list.items()[0].is_completed, 1);

    // Delete from a fresh detail screen.
    let (mut detail, _) = DetailSession::open(repo.clone(), id, ChangeTracking::EntrySnapshot);
    pump(&looper);
    detail.process();
    assert_eq!(detail.dispatch(DetailEvent::DeleteClicked), vec![DetailEffect::ConfirmDelete]);
    assert!(detail.dispatch(DetailEvent::DeleteConfirmed).is_empty());
    pump(&looper);
    assert_eq!(
        detail.process(),
        vec![
            DetailEffect::Toast("Item deleted".to_string()),
            DetailEffect::Finish(ScreenResult::with_change(true)),
        ]
    );

    // A detail screen for the deleted id exits after reporting the error.
    let (mut gone, _) = DetailSession::open(repo.clone(), id, ChangeTracking::EntrySnapshot);
    pump(&looper);
    assert_eq!(
        gone.process(),
        vec![
            DetailEffect::Toast("Lost-found not found".to_string()),
            DetailEffect::Finish(ScreenResult::canceled()),
        ]
    );

    repo.logout();
    assert!(!repo.is_logged_in());
}
