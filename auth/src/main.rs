use storefront_auth::{app, error::AppError};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    app::run().await
}
