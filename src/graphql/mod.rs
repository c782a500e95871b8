//! GraphQL API mirroring the debt and participant REST endpoints.
//!
//! Served at `/graphql`: POST executes operations, GET serves GraphiQL.

mod error;
mod schema;
mod types;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};

pub use schema::{MutationRoot, QueryRoot, SplitpaySchema, build_schema};

use crate::state::AppState;

pub const GRAPHQL_PATH: &str = "/graphql";

pub fn graphql_routes() -> Router<AppState> {
    Router::new().route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
