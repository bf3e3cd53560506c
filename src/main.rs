#[actix_web::main]
async fn main() -> std::io::Result<()> {
    cav_registrar_server::run().await
}
