// HTTP surface: course search, prerequisite graphs, term listing and health checks

pub mod handlers;
pub mod models;
pub mod routes;
