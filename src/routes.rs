use crate::{
    api::{employee, export, timesheet},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/timesheets")
                    // /timesheets
                    .service(
                        web::resource("")
                            .route(web::get().to(timesheet::list_timesheets))
                            .route(web::post().to(timesheet::create_timesheet)),
                    )
                    // /timesheets/preview (before /{id} so the literal wins)
                    .service(
                        web::resource("/preview")
                            .route(web::post().to(timesheet::preview_entries)),
                    )
                    // /timesheets/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(timesheet::get_timesheet))
                            .route(web::put().to(timesheet::save_timesheet)),
                    )
                    // /timesheets/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(timesheet::approve_timesheet)),
                    )
                    // /timesheets/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(timesheet::reject_timesheet)),
                    )
                    // /timesheets/{id}/audit
                    .service(
                        web::resource("/{id}/audit")
                            .route(web::post().to(timesheet::audit_timesheet)),
                    )
                    // /timesheets/{id}/rejection-draft
                    .service(
                        web::resource("/{id}/rejection-draft")
                            .route(web::post().to(timesheet::draft_rejection_comment)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    // /employees/{id}/timesheets
                    .service(
                        web::resource("/{id}/timesheets")
                            .route(web::get().to(employee::employee_timesheets)),
                    )
                    // /employees/{id}/export
                    .service(
                        web::resource("/{id}/export")
                            .route(web::get().to(export::download_report)),
                    ),
            ),
    );
}
