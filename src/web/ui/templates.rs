use askama::Template;
use askama_web::WebTemplate;

pub struct TelemetryRow {
    pub satellite: String,
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

pub struct EntityRow {
    pub id: String,
    pub x_km: String,
    pub y_km: String,
    pub z_km: String,
    pub color: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub poll_summary: String,
    pub telemetry: Vec<TelemetryRow>,
    pub entities: Vec<EntityRow>,
    pub in_flight: bool,
}
