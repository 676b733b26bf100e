use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use momtrack::db;
use momtrack::handlers::{
    attendance_handlers, auth_handlers, meeting_handlers, mom_handlers, user_handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/app.db".to_string());
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool).await.expect("Failed to run migrations");

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    log::info!("Starting server at http://{host}:{port}");

    HttpServer::new(move || {
        // The SPA is served from a different origin during development.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .service(
                web::scope("/api")
                    .route("/register", web::post().to(auth_handlers::register))
                    .route("/login", web::post().to(auth_handlers::login))
                    .route("/users", web::get().to(user_handlers::list))
                    .route("/users/import", web::post().to(user_handlers::import))
                    .route("/users/me/photo", web::post().to(user_handlers::update_photo))
                    .route("/meetings", web::get().to(meeting_handlers::list))
                    .route("/meetings", web::post().to(meeting_handlers::create))
                    .route("/meetings/{id}", web::get().to(meeting_handlers::detail))
                    .route(
                        "/meetings/{id}/attendees",
                        web::post().to(meeting_handlers::add_attendee),
                    )
                    .route(
                        "/meetings/{id}/stickynotes",
                        web::post().to(meeting_handlers::add_sticky_note),
                    )
                    .route("/meetings/{id}/mom", web::post().to(mom_handlers::submit))
                    .route(
                        "/meetings/{id}/mom",
                        web::get().to(mom_handlers::list_for_meeting),
                    )
                    .route(
                        "/meetings/{id}/mom/groups",
                        web::get().to(mom_handlers::groups),
                    )
                    .route(
                        "/mom/merged-groups",
                        web::get().to(mom_handlers::merged_groups),
                    )
                    .route(
                        "/mom/{id}/update-status",
                        web::post().to(mom_handlers::update_status),
                    )
                    .route(
                        "/mom/{id}/deadline-history",
                        web::get().to(mom_handlers::deadline_history),
                    )
                    .route("/mom/{id}/reassign", web::post().to(mom_handlers::reassign))
                    .route("/mom/{id}/need-time", web::post().to(mom_handlers::need_time)),
            )
            // Report endpoints live at the root, as the SPA expects.
            .route("/meeting-names", web::get().to(meeting_handlers::names))
            .route(
                "/attendance-summary",
                web::get().to(attendance_handlers::summary),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
