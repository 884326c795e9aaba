//! End-to-end tests: the router served on an ephemeral port, driven through
//! `HttpCatalogClient`.

mod common;

use std::net::SocketAddr;

use rstest::rstest;
use tokio::net::TcpListener;

use catalog_browser::api::{AppState, ListItemsQuery, router};
use catalog_browser::client::{
    BrowserSession, CatalogClient, ClientConfig, ClientError, HttpCatalogClient,
};
use catalog_browser::domain::ViewState;

use common::{create_app_state_with_size, ids};

async fn spawn_service(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    address
}

fn client_for(address: SocketAddr) -> HttpCatalogClient {
    let config = ClientConfig::with_base_url(&format!("http://{address}/")).unwrap();
    HttpCatalogClient::new(config)
}

#[rstest]
#[tokio::test]
async fn list_items_over_http() {
    let address = spawn_service(create_app_state_with_size(1_000)).await;
    let client = client_for(address);

    let response = client
        .list_items(ListItemsQuery::page("99", 0, 5))
        .await
        .unwrap();

    assert_eq!(response.items, ids(&[99, 199, 299, 399, 499]));
    assert_eq!(response.total, 19);

    let response = client
        .list_items(ListItemsQuery::by_ids(&ids(&[5, 3, 1])))
        .await
        .unwrap();
    assert_eq!(response.items, ids(&[5, 3, 1]));
    assert_eq!(response.total, 3);
}

#[rstest]
#[tokio::test]
async fn state_round_trip_over_http() {
    let address = spawn_service(create_app_state_with_size(10)).await;
    let client = client_for(address);

    let saved = client
        .save_state(ViewState::new("foo", ids(&[1, 2]), ids(&[2, 1])))
        .await
        .unwrap();
    assert!(saved.success);

    let loaded = client.load_state().await.unwrap();
    assert_eq!(loaded, ViewState::new("foo", ids(&[1, 2]), ids(&[2, 1])));
}

#[rstest]
#[tokio::test]
async fn session_over_http() {
    let address = spawn_service(create_app_state_with_size(50)).await;
    let mut session = BrowserSession::new(client_for(address));

    session.bootstrap().await.unwrap();
    session.end_drag(2, Some(0)).await.unwrap();

    assert_eq!(session.order()[..3], ids(&[3, 1, 2])[..]);
    let stored = session.client().load_state().await.unwrap();
    assert_eq!(stored.order, session.order());
}

#[rstest]
#[tokio::test]
async fn unknown_path_maps_to_unexpected_status() {
    let address = spawn_service(create_app_state_with_size(10)).await;
    let config = ClientConfig::with_base_url(&format!("http://{address}/missing")).unwrap();
    let client = HttpCatalogClient::new(config);

    let result = client.load_state().await;

    assert_eq!(result, Err(ClientError::UnexpectedStatus(404)));
}
