pub mod games;
pub mod users;

pub use games::{GameCatalog, HttpGameCatalog, PgGameCatalog};
pub use users::{HttpUserDirectory, UserDirectory};

/// Serve `app` on an ephemeral local port and return its base URL
#[cfg(test)]
pub(crate) async fn spawn_stub_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
