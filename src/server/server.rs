use anyhow::Result;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogError, NodeFields};
use crate::graph::{normalize, NodeKind, RelationType};
use crate::view;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use super::http_layers::log_requests;
use super::state::*;
use super::ServerConfig;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub artists: usize,
    pub albums: usize,
    pub songs: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Domain failures map onto HTTP statuses: unknown ids are 404, everything
/// else (cardinality, duplicates) is a conflict.
fn error_response(err: CatalogError) -> Response {
    let status = match err {
        CatalogError::NotFound { .. } | CatalogError::UnknownNode { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::CONFLICT,
    };
    (status, err.to_string()).into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let catalog = state.catalog.lock().unwrap();
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        artists: catalog.get_artists_count(),
        albums: catalog.get_albums_count(),
        songs: catalog.get_songs_count(),
    };
    Json(stats)
}

async fn get_graph(State(catalog): State<GuardedCatalog>) -> Response {
    Json(catalog.lock().unwrap().graph_response()).into_response()
}

async fn get_normalized_graph(State(catalog): State<GuardedCatalog>) -> Response {
    let response = catalog.lock().unwrap().graph_response();
    Json(normalize(&response)).into_response()
}

#[derive(Serialize, Deserialize)]
struct GraphStats {
    nodes: usize,
    links: usize,
    artists: usize,
    albums: usize,
    songs: usize,
}

async fn get_graph_stats(State(catalog): State<GuardedCatalog>) -> Response {
    let response = catalog.lock().unwrap().graph_response();
    let graph = normalize(&response);
    let stats = GraphStats {
        nodes: graph.nodes.len(),
        links: graph.links.len(),
        artists: graph.count_of_kind(NodeKind::Artist),
        albums: graph.count_of_kind(NodeKind::Album),
        songs: graph.count_of_kind(NodeKind::Song),
    };
    Json(stats).into_response()
}

async fn get_style() -> Response {
    Json(view::legend()).into_response()
}

async fn list_artists(State(catalog): State<GuardedCatalog>) -> Response {
    let artists: Vec<_> = catalog.lock().unwrap().iter_artists().cloned().collect();
    Json(artists).into_response()
}

async fn list_albums(State(catalog): State<GuardedCatalog>) -> Response {
    let albums: Vec<_> = catalog.lock().unwrap().iter_albums().cloned().collect();
    Json(albums).into_response()
}

async fn list_songs(State(catalog): State<GuardedCatalog>) -> Response {
    let songs: Vec<_> = catalog.lock().unwrap().iter_songs().cloned().collect();
    Json(songs).into_response()
}

async fn create_node(
    State(catalog): State<GuardedCatalog>,
    Json(fields): Json<NodeFields>,
) -> Response {
    let record = catalog.lock().unwrap().create_node(fields);
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_node(
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
    Json(fields): Json<NodeFields>,
) -> Response {
    match catalog.lock().unwrap().update_node(&id, fields) {
        Ok(record) => Json(record).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_node(State(catalog): State<GuardedCatalog>, Path(id): Path<String>) -> Response {
    match catalog.lock().unwrap().delete_node(&id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Serialize, Deserialize)]
struct RelationshipRequest {
    relation: RelationType,
    from: String,
    to: String,
}

async fn connect_relationship(
    State(catalog): State<GuardedCatalog>,
    Json(body): Json<RelationshipRequest>,
) -> Response {
    match catalog
        .lock()
        .unwrap()
        .connect(body.relation, &body.from, &body.to)
    {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => error_response(err),
    }
}

async fn disconnect_relationship(
    State(catalog): State<GuardedCatalog>,
    Json(body): Json<RelationshipRequest>,
) -> Response {
    match catalog
        .lock()
        .unwrap()
        .disconnect(body.relation, &body.from, &body.to)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn make_app(config: ServerConfig, catalog: Catalog) -> Router {
    let state = ServerState::new(config.clone(), catalog);

    let graph_routes: Router = Router::new()
        .route("/graph", get(get_graph))
        .route("/graph/normalized", get(get_normalized_graph))
        .route("/graph/stats", get(get_graph_stats))
        .route("/graph/style", get(get_style))
        .route("/artists", get(list_artists))
        .route("/albums", get(list_albums))
        .route("/songs", get(list_songs))
        .route("/node", post(create_node))
        .route("/node/{id}", put(update_node))
        .route("/node/{id}", delete(delete_node))
        .route("/relationship", post(connect_relationship))
        .route("/relationship", delete(disconnect_relationship))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/v1", graph_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, catalog: Catalog) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;
    use crate::graph::GraphData;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt; // for `oneshot`

    fn sample_app() -> Router {
        make_app(ServerConfig::default(), sample_catalog())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn fetch_normalized(app: &Router) -> GraphData {
        let response = app
            .clone()
            .oneshot(get("/v1/graph/normalized"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_value(body_json(response).await).unwrap()
    }

    #[tokio::test]
    async fn home_reports_catalog_counts() {
        let app = sample_app();
        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stats = body_json(response).await;
        assert_eq!(stats["artists"], 3);
        assert_eq!(stats["albums"], 3);
        assert_eq!(stats["songs"], 5);
    }

    #[tokio::test]
    async fn normalized_graph_deduplicates_sample_data() {
        let app = sample_app();
        let graph = fetch_normalized(&app).await;

        assert_eq!(graph.nodes.len(), 11);
        assert_eq!(graph.links.len(), 16);
    }

    #[tokio::test]
    async fn nested_graph_lists_all_roots() {
        let app = sample_app();
        let response = app.clone().oneshot(get("/v1/graph")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["artists"].as_array().unwrap().len(), 3);
        assert_eq!(body["albums"].as_array().unwrap().len(), 3);
        assert_eq!(body["songs"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn graph_stats_count_by_kind() {
        let app = sample_app();
        let response = app.clone().oneshot(get("/v1/graph/stats")).await.unwrap();

        let stats = body_json(response).await;
        assert_eq!(stats["nodes"], 11);
        assert_eq!(stats["links"], 16);
        assert_eq!(stats["artists"], 3);
        assert_eq!(stats["albums"], 3);
        assert_eq!(stats["songs"], 5);
    }

    #[tokio::test]
    async fn style_legend_is_served() {
        let app = sample_app();
        let response = app.clone().oneshot(get("/v1/graph/style")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let legend = body_json(response).await;
        assert_eq!(legend["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(legend["links"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn created_node_shows_up_in_refetched_graph() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/node",
                r#"{ "kind": "artist", "name": "George Harrison", "nationality": "UK" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["name"], "George Harrison");

        let graph = fetch_normalized(&app).await;
        assert_eq!(graph.nodes.len(), 12);
        assert!(graph
            .nodes
            .iter()
            .any(|n| n.name == "George Harrison" && n.kind == NodeKind::Artist));
    }

    #[tokio::test]
    async fn update_node_changes_attributes() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/v1/node/1",
                r#"{ "kind": "artist", "name": "The Beatles (Remastered)" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let graph = fetch_normalized(&app).await;
        let artist = graph.nodes.iter().find(|n| n.id == "1").unwrap();
        assert_eq!(artist.name, "The Beatles (Remastered)");
    }

    #[tokio::test]
    async fn update_with_wrong_kind_is_conflict() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/v1/node/1",
                r#"{ "kind": "song", "title": "Not A Song" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn deleting_an_artist_detaches_its_edges() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/node/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let graph = fetch_normalized(&app).await;
        assert_eq!(graph.nodes.len(), 10);
        assert!(!graph
            .links
            .iter()
            .any(|l| l.source == "1" && l.relation == RelationType::Released));
    }

    #[tokio::test]
    async fn deleting_unknown_node_is_not_found() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/node/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn connecting_and_disconnecting_changes_the_graph() {
        let app = sample_app();

        // Song 3 is only performed by artist 1 in the sample.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/relationship",
                r#"{ "relation": "PERFORMED", "from": "3", "to": "3" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let graph = fetch_normalized(&app).await;
        assert_eq!(graph.links.len(), 17);

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                "/v1/relationship",
                r#"{ "relation": "PERFORMED", "from": "3", "to": "3" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let graph = fetch_normalized(&app).await;
        assert_eq!(graph.links.len(), 16);
    }

    #[tokio::test]
    async fn second_releasing_artist_is_rejected() {
        let app = sample_app();
        // Album 1 already belongs to artist 1.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/relationship",
                r#"{ "relation": "RELEASED", "from": "2", "to": "1" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn second_containing_album_is_rejected() {
        let app = sample_app();
        // Song 1 already lives on album 1.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/relationship",
                r#"{ "relation": "CONTAINS", "from": "2", "to": "1" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn duplicate_relationship_is_rejected() {
        let app = sample_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/relationship",
                r#"{ "relation": "PERFORMED", "from": "1", "to": "1" }"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn listing_endpoints_serve_dropdown_data() {
        let app = sample_app();
        for (uri, expected) in [("/v1/artists", 3), ("/v1/albums", 3), ("/v1/songs", 5)] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body.as_array().unwrap().len(), expected);
        }
    }
}
