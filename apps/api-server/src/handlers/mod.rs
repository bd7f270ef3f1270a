//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod follows;
mod groups;
mod health;
mod pagination;
mod posts;

use actix_web::web;

/// Configure all application routes.
///
/// Paths are registered without trailing slashes; the app normalizes
/// incoming paths so `/posts/` and `/posts` reach the same handler.
/// Unlisted methods on a known path get 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                // Posts
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::list))
                        .route(web::post().to(posts::create)),
                )
                .service(
                    web::resource("/posts/{post_id}")
                        .route(web::get().to(posts::retrieve))
                        .route(web::put().to(posts::update))
                        .route(web::patch().to(posts::partial_update))
                        .route(web::delete().to(posts::delete)),
                )
                // Comments
                .service(
                    web::resource("/posts/{post_id}/comments")
                        .route(web::get().to(comments::list))
                        .route(web::post().to(comments::create)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments/{comment_id}")
                        .route(web::get().to(comments::retrieve))
                        .route(web::put().to(comments::update))
                        .route(web::patch().to(comments::partial_update))
                        .route(web::delete().to(comments::delete)),
                )
                // Groups (read-only)
                .service(web::resource("/groups").route(web::get().to(groups::list)))
                .service(web::resource("/groups/{group_id}").route(web::get().to(groups::retrieve)))
                // Follows
                .service(
                    web::resource("/follow")
                        .route(web::get().to(follows::list))
                        .route(web::post().to(follows::create)),
                )
                .service(
                    web::resource("/follow/{follow_id}")
                        .route(web::get().to(follows::retrieve))
                        .route(web::delete().to(follows::delete)),
                )
                // Accounts and tokens
                .service(web::resource("/users").route(web::post().to(auth::register)))
                .service(web::resource("/users/me").route(web::get().to(auth::me)))
                .service(web::resource("/jwt/create").route(web::post().to(auth::create_token)))
                .service(web::resource("/jwt/refresh").route(web::post().to(auth::refresh_token)))
                .service(web::resource("/jwt/verify").route(web::post().to(auth::verify_token))),
        );
}
