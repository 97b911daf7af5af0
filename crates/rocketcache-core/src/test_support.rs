//! Fixtures shared by unit tests across modules.

use crate::models::{CompanyDto, CompanyRecord, LaunchDto, LaunchOutcome, LaunchRecord};

pub(crate) fn launch_record(
    flight_number: i64,
    launch_date_unix: i64,
    outcome: LaunchOutcome,
) -> LaunchRecord {
    LaunchRecord {
        flight_number,
        mission_name: format!("Mission {}", flight_number),
        launch_year: String::new(),
        launch_date_unix,
        launch_date_utc: "2020-05-30T19:22:00.000Z".to_string(),
        launch_date_local: "2020-05-30T15:22:00-04:00".to_string(),
        rocket_id: "falcon9".to_string(),
        rocket_name: "Falcon 9".to_string(),
        rocket_type: "FT".to_string(),
        site_id: "ksc_lc_39a".to_string(),
        site_name: "KSC LC 39A".to_string(),
        site_name_long: "Kennedy Space Center Historic Launch Complex 39A".to_string(),
        outcome,
        upcoming: false,
        details: None,
        mission_patch_url: None,
        mission_patch_small_url: None,
        article_url: None,
        video_url: None,
        wikipedia_url: None,
        customers: None,
        payload_type: None,
        orbit: None,
        payload_mass_kg: None,
    }
}

pub(crate) fn launch_dto(
    flight_number: i64,
    launch_date_unix: i64,
    success: Option<bool>,
) -> LaunchDto {
    let json = serde_json::json!({
        "flight_number": flight_number,
        "mission_name": format!("Mission {}", flight_number),
        "launch_year": "2020",
        "launch_date_unix": launch_date_unix,
        "launch_date_utc": "2020-05-30T19:22:00.000Z",
        "launch_date_local": "2020-05-30T15:22:00-04:00",
        "rocket": {"rocket_id": "falcon9", "rocket_name": "Falcon 9", "rocket_type": "FT"},
        "launch_site": {
            "site_id": "ksc_lc_39a",
            "site_name": "KSC LC 39A",
            "site_name_long": "Kennedy Space Center"
        },
        "launch_success": success,
        "links": {}
    });
    serde_json::from_value(json).expect("fixture launch should deserialize")
}

pub(crate) fn company_dto() -> CompanyDto {
    CompanyDto {
        name: "SpaceX".to_string(),
        founder: "Elon Musk".to_string(),
        founded: 2002,
        employees: 7000,
        launch_sites: 3,
        valuation: 27_500_000_000,
    }
}

pub(crate) fn company_record() -> CompanyRecord {
    company_dto().to_record()
}
