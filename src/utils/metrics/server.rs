//! Metrics server module
//!
//! Serves the Prometheus registry over HTTP. Every scrape refreshes the pool gauges from
//! the live registries before encoding.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
	services::blockchain::ChainRegistries,
	utils::metrics::{gather_metrics, update_pool_metrics},
};

pub type RegistriesData = web::Data<Arc<ChainRegistries>>;

/// Metrics endpoint handler
async fn metrics_handler(registries: RegistriesData) -> impl Responder {
	update_pool_metrics(&registries).await;

	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// Address the server actually binds to.
///
/// Inside a container (`IN_DOCKER=true`) the host part is replaced by `0.0.0.0`.
fn resolve_bind_address(bind_address: &str, in_docker: bool) -> String {
	if !in_docker {
		return bind_address.to_string();
	}
	match bind_address.rsplit_once(':') {
		Some((_, port)) if !port.is_empty() => format!("0.0.0.0:{}", port),
		_ => "0.0.0.0:8081".to_string(),
	}
}

pub fn create_metrics_server(
	bind_address: String,
	registries: Arc<ChainRegistries>,
) -> std::io::Result<actix_web::dev::Server> {
	let in_docker = std::env::var("IN_DOCKER").unwrap_or_default() == "true";
	let actual_bind_address = resolve_bind_address(&bind_address, in_docker);

	info!(
		"Starting metrics server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::new(registries.clone()))
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
