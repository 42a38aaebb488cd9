use parking_billing_backend::routes::make_app;
use std::error::Error;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let (app, bind_addr) = make_app().await?;
    let listener = TcpListener::bind(&bind_addr).await?;
    println!("🚀 Server started successfully");
    axum::serve(listener, app).await?;
    Ok(())
}
