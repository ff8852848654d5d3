use mock_server::{MockBehavior, MockSurgeServer};

fn main() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let _g = rt.enter();
    rt.block_on(run_server());
}

async fn run_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();
    let server = MockSurgeServer::new(MockBehavior::Accept {
        surge_multiplier: 1.8,
    });
    axum::serve(listener, server.router()).await.unwrap()
}
