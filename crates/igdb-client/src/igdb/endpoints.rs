//! Typed call sites for the resources the app uses
//!
//! Each helper is one `QueryBuilder` configuration over `ApiClient::request`.

use super::client::ApiClient;
use super::error::{ApiError, ApiResult};
use super::http::HttpClient;
use super::query::{QueryBuilder, SortDirection};
use super::types::{Franchise, Game, Screenshot, TimeToBeat};
use crate::time::Clock;

const GAME_FIELDS: &[&str] = &[
    "name",
    "summary",
    "cover.image_id",
    "first_release_date",
    "platforms.name",
    "genres.name",
    "franchises",
    "total_rating",
];

fn id_list(ids: &[u64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn game_query() -> ApiResult<QueryBuilder> {
    let mut query = QueryBuilder::new();
    query.fields(GAME_FIELDS)?;
    Ok(query)
}

// Game-related methods
impl<H, C> ApiClient<H, C>
where
    H: HttpClient + 'static,
    C: Clock + 'static,
{
    /// Searches games by name, best matches first
    pub async fn search_games(&self, name: &str, limit: i64) -> ApiResult<Vec<Game>> {
        if name.trim().is_empty() {
            return Err(ApiError::invalid("search term must not be empty"));
        }

        let mut query = game_query()?;
        query.search(name.trim()).limit(limit)?;

        self.request("games", &query.build()).await
    }

    /// Gets a single game by id
    ///
    /// Returns `Ok(None)` if IGDB has no game with that id.
    pub async fn game_by_id(&self, id: u64) -> ApiResult<Option<Game>> {
        let mut query = game_query()?;
        query.where_clause(format!("id = ({id})")).limit(1)?;

        let games: Vec<Game> = self.request("games", &query.build()).await?;
        Ok(games.into_iter().next())
    }

    /// Gets several games by id, in IGDB's order
    pub async fn games_by_ids(&self, ids: &[u64]) -> ApiResult<Vec<Game>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = game_query()?;
        query
            .where_clause(format!("id = ({})", id_list(ids)))
            .limit(ids.len() as i64)?;

        self.request("games", &query.build()).await
    }
}

// Media-related methods
impl<H, C> ApiClient<H, C>
where
    H: HttpClient + 'static,
    C: Clock + 'static,
{
    /// Gets the screenshots for a game
    pub async fn screenshots_for_game(&self, game_id: u64) -> ApiResult<Vec<Screenshot>> {
        let mut query = QueryBuilder::new();
        query
            .fields(["game", "image_id", "width", "height"])?
            .where_clause(format!("game = {game_id}"))
            .sort("id", SortDirection::Asc)
            .limit(50)?;

        self.request("screenshots", &query.build()).await
    }
}

// Franchise and completion-time methods
impl<H, C> ApiClient<H, C>
where
    H: HttpClient + 'static,
    C: Clock + 'static,
{
    /// Gets franchises by id
    pub async fn franchises_by_ids(&self, ids: &[u64]) -> ApiResult<Vec<Franchise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new();
        query
            .fields(["name", "games"])?
            .where_clause(format!("id = ({})", id_list(ids)))
            .limit(ids.len() as i64)?;

        self.request("franchises", &query.build()).await
    }

    /// Gets completion time estimates for a game
    ///
    /// Returns `Ok(None)` if nobody has reported times for it yet.
    pub async fn time_to_beat(&self, game_id: u64) -> ApiResult<Option<TimeToBeat>> {
        let mut query = QueryBuilder::new();
        query
            .fields(["game_id", "hastily", "normally", "completely", "count"])?
            .where_clause(format!("game_id = {game_id}"))
            .limit(1)?;

        let entries: Vec<TimeToBeat> = self.request("game_time_to_beats", &query.build()).await?;
        Ok(entries.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use crate::igdb::http::mock::MockHttpClient;
    use crate::igdb::{ApiClient, ApiError, TokenManager};
    use crate::testutil::{
        api_url, example_game_json, franchises_json, screenshots_json, search_results_json,
        test_config, time_to_beat_json, token_json, TOKEN_URL,
    };
    use crate::time::MockClock;

    fn client(mock: &MockHttpClient) -> ApiClient<MockHttpClient, MockClock> {
        let config = test_config();
        let tokens = TokenManager::with_http_client(&config, mock.clone(), MockClock::now()).unwrap();
        ApiClient::with_http_client(&config, tokens, mock.clone())
    }

    fn with_token() -> MockHttpClient {
        MockHttpClient::new().on_post(TOKEN_URL, 200, token_json("tok", 3600))
    }

    fn last_body(mock: &MockHttpClient) -> String {
        mock.get_requests().last().unwrap().body.clone()
    }

    // === search_games tests ===

    #[tokio::test]
    async fn search_games_returns_results() {
        let mock = with_token().on_post(&api_url("games"), 200, search_results_json());
        let client = client(&mock);

        let games = client.search_games("zelda", 10).await.unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 1025);
        assert_eq!(
            last_body(&mock),
            "fields name,summary,cover.image_id,first_release_date,platforms.name,genres.name,franchises,total_rating;\n\
             search \"zelda\";\n\
             limit 10;"
        );
    }

    #[tokio::test]
    async fn search_games_escapes_quotes() {
        let mock = with_token().on_post(&api_url("games"), 200, "[]");
        let client = client(&mock);

        let games = client.search_games(r#"say "hi""#, 5).await.unwrap();

        assert!(games.is_empty());
        assert!(last_body(&mock).contains(r#"search "say \"hi\"";"#));
    }

    #[tokio::test]
    async fn search_games_rejects_bad_input_without_network() {
        let mock = with_token();
        let client = client(&mock);

        assert!(matches!(
            client.search_games("   ", 10).await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.search_games("zelda", 0).await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(mock.get_requests().is_empty());
    }

    // === game_by_id tests ===

    #[tokio::test]
    async fn game_by_id_returns_first_match() {
        let mock = with_token().on_post(&api_url("games"), 200, example_game_json());
        let client = client(&mock);

        let game = client.game_by_id(1942).await.unwrap().unwrap();

        assert_eq!(game.name.as_deref(), Some("Example Game"));
        let body = last_body(&mock);
        assert!(body.contains("where id = (1942);"));
        assert!(body.ends_with("limit 1;"));
    }

    #[tokio::test]
    async fn game_by_id_missing_is_none() {
        let mock = with_token().on_post(&api_url("games"), 200, "[]");
        let client = client(&mock);

        assert!(client.game_by_id(999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn games_by_ids_builds_id_list() {
        let mock = with_token().on_post(&api_url("games"), 200, search_results_json());
        let client = client(&mock);

        let games = client.games_by_ids(&[1025, 1026]).await.unwrap();

        assert_eq!(games.len(), 2);
        let body = last_body(&mock);
        assert!(body.contains("where id = (1025,1026);"));
        assert!(body.ends_with("limit 2;"));
    }

    #[tokio::test]
    async fn games_by_ids_empty_skips_network() {
        let mock = MockHttpClient::new();
        let client = client(&mock);

        assert!(client.games_by_ids(&[]).await.unwrap().is_empty());
        assert!(client.franchises_by_ids(&[]).await.unwrap().is_empty());
        assert!(mock.get_requests().is_empty());
    }

    // === media, franchise and time-to-beat tests ===

    #[tokio::test]
    async fn screenshots_for_game_filters_by_game() {
        let mock = with_token().on_post(&api_url("screenshots"), 200, screenshots_json());
        let client = client(&mock);

        let shots = client.screenshots_for_game(1942).await.unwrap();

        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].image_id, "sc6l1a");
        assert_eq!(
            last_body(&mock),
            "fields game,image_id,width,height;\nwhere game = 1942;\nsort id asc;\nlimit 50;"
        );
    }

    #[tokio::test]
    async fn franchises_by_ids_returns_franchises() {
        let mock = with_token().on_post(&api_url("franchises"), 200, franchises_json());
        let client = client(&mock);

        let franchises = client.franchises_by_ids(&[596]).await.unwrap();

        assert_eq!(franchises[0].name, "The Legend of Zelda");
        assert_eq!(
            last_body(&mock),
            "fields name,games;\nwhere id = (596);\nlimit 1;"
        );
    }

    #[tokio::test]
    async fn time_to_beat_returns_estimates() {
        let mock = with_token().on_post(&api_url("game_time_to_beats"), 200, time_to_beat_json());
        let client = client(&mock);

        let ttb = client.time_to_beat(1942).await.unwrap().unwrap();

        assert_eq!(ttb.hastily, Some(36_000));
        assert!(last_body(&mock).contains("where game_id = 1942;"));
    }

    #[tokio::test]
    async fn time_to_beat_without_reports_is_none() {
        let mock = with_token().on_post(&api_url("game_time_to_beats"), 200, "[]");
        let client = client(&mock);

        assert!(client.time_to_beat(1).await.unwrap().is_none());
    }
}
