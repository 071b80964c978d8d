// Application state for HTTP handlers
use crate::application::forecast_service::ForecastService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub forecast_service: ForecastService,
    pub report_service: ReportService,
}
