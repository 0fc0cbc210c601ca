use crate::errors::GatewayError;
use crate::gateway_state::{GatewayConfig, GatewayState};
use crate::io_struct::{OpenerReqInput, OutputFormat, parse_request};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use serde_json::json;
use std::io::Write;

#[get("/ping/")]
pub async fn ping(_req: HttpRequest, _: web::Data<GatewayState>) -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

#[get("/status/")]
pub async fn status(_req: HttpRequest, app_state: web::Data<GatewayState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "config": {
            "accept": OutputFormat::ALL.iter().map(|f| f.mime()).collect::<Vec<_>>(),
            "steps": app_state.registry.step_names(),
            "urls": app_state.registry.url_map(),
        }
    }))
}

#[post("/opener/")]
pub async fn opener(
    req: HttpRequest,
    body: web::Json<OpenerReqInput>,
    app_state: web::Data<GatewayState>,
) -> Result<HttpResponse, GatewayError> {
    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());
    let request = parse_request(body.into_inner(), accept, &app_state.registry)?;
    let format = request.format;

    let output = app_state.process(request).await?;

    Ok(HttpResponse::Ok().content_type(format.mime()).body(output))
}

pub async fn startup(config: GatewayConfig, state: GatewayState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    println!("Starting server at {}:{}", config.host, config.port);

    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .parse_filters(&config.log_level)
        .init();

    if app_state.registry.is_empty() {
        log::warn!("no OPENER_<STEP>_URL variables configured, every request will be rejected");
    }

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .service(ping)
            .service(status)
            .service(opener)
    })
    .workers(config.workers)
    .bind((config.host, config.port))?
    .run()
    .await
}
