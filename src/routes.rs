use crate::{
    api::{attendance, board},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Per-route limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
                    .service(
                        web::resource("/check-out").route(web::put().to(attendance::check_out)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/stats").route(web::get().to(attendance::stats)))
                    .service(web::resource("/history").route(web::get().to(attendance::history)))
                    .service(web::resource("/daily").route(web::get().to(attendance::daily))),
            )
            .service(
                web::scope("/board")
                    // /board
                    .service(web::resource("").route(web::get().to(board::get_board)))
                    // /board/columns
                    .service(
                        web::resource("/columns").route(web::post().to(board::create_column)),
                    )
                    // /board/columns/{id}
                    .service(
                        web::resource("/columns/{id}")
                            .route(web::put().to(board::update_column))
                            .route(web::delete().to(board::delete_column)),
                    )
                    // /board/tasks
                    .service(web::resource("/tasks").route(web::post().to(board::create_task)))
                    // /board/tasks/{id}
                    .service(
                        web::resource("/tasks/{id}")
                            .route(web::put().to(board::update_task))
                            .route(web::delete().to(board::delete_task)),
                    )
                    // /board/tasks/{id}/move
                    .service(
                        web::resource("/tasks/{id}/move").route(web::put().to(board::move_task)),
                    ),
            ),
    );
}
