//! Test fixtures
//!
//! Endpoints, config and canned payloads shared by the unit tests.

use serde_json::json;

use crate::config::IgdbConfig;

pub const TOKEN_URL: &str = "https://id.example.test/oauth2/token";
pub const API_BASE: &str = "https://api.example.test/v4";

/// Returns the full URL for an API resource
pub fn api_url(resource: &str) -> String {
    format!("{API_BASE}/{}", resource.trim_start_matches('/'))
}

/// Config pointing at the fixture endpoints
pub fn test_config() -> IgdbConfig {
    IgdbConfig {
        client_id: "test_client_id".to_string(),
        client_secret: "test secret".to_string(),
        token_url: TOKEN_URL.to_string(),
        api_base_url: API_BASE.to_string(),
        request_timeout_secs: 5,
        token_timeout_secs: 10,
        token_safety_margin_secs: 60,
    }
}

/// Body of a successful token response
pub fn token_json(access_token: &str, expires_in: i64) -> String {
    json!({
        "access_token": access_token,
        "expires_in": expires_in,
        "token_type": "bearer",
    })
    .to_string()
}

/// A single game as returned for `fields name,cover.image_id`
pub fn example_game_json() -> String {
    json!([{
        "id": 1942,
        "name": "Example Game",
        "cover": { "id": 77, "image_id": "abc123" },
    }])
    .to_string()
}

/// Search results with the detail fields populated
pub fn search_results_json() -> String {
    json!([
        {
            "id": 1025,
            "name": "Zelda II: The Adventure of Link",
            "cover": { "id": 1, "image_id": "co1uii" },
            "first_release_date": 528_336_000,
            "platforms": [{ "id": 18, "name": "Nintendo Entertainment System" }],
            "genres": [{ "id": 12, "name": "Role-playing (RPG)" }],
            "total_rating": 71.5,
        },
        {
            "id": 1026,
            "name": "The Legend of Zelda: A Link to the Past",
            "first_release_date": 690_249_600,
        },
    ])
    .to_string()
}

/// Screenshots for a game
pub fn screenshots_json() -> String {
    json!([
        { "id": 10, "game": 1942, "image_id": "sc6l1a", "width": 1920, "height": 1080 },
        { "id": 11, "game": 1942, "image_id": "sc6l1b" },
    ])
    .to_string()
}

/// Franchises
pub fn franchises_json() -> String {
    json!([
        { "id": 596, "name": "The Legend of Zelda", "games": [1022, 1025, 1026] },
    ])
    .to_string()
}

/// Time-to-beat estimates for a game
pub fn time_to_beat_json() -> String {
    json!([
        { "id": 5, "game_id": 1942, "hastily": 36_000, "normally": 54_000, "completely": 108_000, "count": 12 },
    ])
    .to_string()
}
