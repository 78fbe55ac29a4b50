//! Live position provider client.
//!
//! The [`PositionClient`] trait abstracts the live position source so the
//! orchestrator and tests do not depend on a concrete service. The
//! [`OpenSkyClient`] implementation authenticates with an OAuth2
//! client-credentials flow, caches the token until shortly before expiry,
//! and queries the state-vector endpoint for the tracked callsign.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ProviderError;
use crate::status::{FlightQuery, PositionFix};

/// Feet per meter, for barometric altitude conversion.
const FEET_PER_METER: f64 = 3.28084;

/// Knots per meter/second, for ground speed conversion.
const KNOTS_PER_MPS: f64 = 1.94384;

/// Refresh the OAuth token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Trait for fetching the tracked flight's live position.
///
/// A definitive "this flight is unknown" response maps to
/// [`ProviderError::NotFound`]; every other failure is transient.
pub trait PositionClient: Send + Sync {
    /// Fetch the current position for the queried flight.
    fn query(
        &self,
        query: &FlightQuery,
    ) -> impl Future<Output = Result<PositionFix, ProviderError>> + Send;
}

/// OAuth2 token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// State-vector endpoint response.
///
/// The provider reports `states` as `null` when it does not know the
/// callsign; each state is a positional JSON array.
#[derive(Deserialize)]
struct StatesResponse {
    #[serde(default)]
    states: Option<Vec<serde_json::Value>>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Position client for an OpenSky-style state-vector API.
pub struct OpenSkyClient<H: AsyncHttpClient> {
    http: H,
    client_id: String,
    client_secret: String,
    token_url: String,
    states_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl<H: AsyncHttpClient> OpenSkyClient<H> {
    /// Create a client for the given endpoints and OAuth credentials.
    pub fn new(
        http: H,
        client_id: String,
        client_secret: String,
        token_url: String,
        states_url: String,
    ) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            token_url,
            states_url,
            token: Mutex::new(None),
        }
    }

    /// Return a valid access token, fetching a fresh one when the cached
    /// token is absent or about to expire.
    async fn access_token(&self) -> Result<String, ProviderError> {
        {
            let guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = guard.as_ref() {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let body = self
            .http
            .post_form(
                &self.token_url,
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", &self.client_id),
                    ("client_secret", &self.client_secret),
                ],
            )
            .await
            .map_err(|e| ProviderError::Auth(e.to_string()))?;

        let parsed: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Auth(e.to_string()))?;

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let expires_at = Instant::now() + lifetime;
        debug!(expires_in = parsed.expires_in, "position provider token refreshed");

        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(CachedToken {
            token: parsed.access_token.clone(),
            expires_at,
        });

        Ok(parsed.access_token)
    }
}

impl<H: AsyncHttpClient> PositionClient for OpenSkyClient<H> {
    async fn query(&self, query: &FlightQuery) -> Result<PositionFix, ProviderError> {
        let token = self.access_token().await?;

        let url = format!("{}?callsign={}", self.states_url, query.ident);
        let body = self.http.get_with_bearer(&url, &token).await?;

        let parsed: StatesResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let states = parsed.states.unwrap_or_default();
        debug!(
            callsign = %query.ident,
            states = states.len(),
            "position provider responded"
        );

        let state = states
            .first()
            .ok_or_else(|| ProviderError::NotFound(query.ident.clone()))?;

        parse_state_vector(state, &query.ident)
    }
}

/// Parse one positional state vector into a [`PositionFix`].
///
/// Indices follow the provider's documented layout: 1 = callsign,
/// 5 = longitude, 6 = latitude, 7 = barometric altitude (m),
/// 9 = velocity (m/s), 10 = true track (deg). A vector without
/// coordinates is malformed; altitude/speed/track default to zero.
fn parse_state_vector(state: &serde_json::Value, ident: &str) -> Result<PositionFix, ProviderError> {
    let callsign = state
        .get(1)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(ident)
        .to_string();

    let longitude = state
        .get(5)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ProviderError::Malformed("state vector missing longitude".to_string()))?;
    let latitude = state
        .get(6)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ProviderError::Malformed("state vector missing latitude".to_string()))?;

    let baro_altitude_m = state.get(7).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let velocity_mps = state.get(9).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let track = state.get(10).and_then(|v| v.as_f64()).unwrap_or(0.0);

    Ok(PositionFix {
        callsign,
        latitude,
        longitude,
        altitude_ft: (baro_altitude_m * FEET_PER_METER).round() as i32,
        ground_speed_kt: (velocity_mps * KNOTS_PER_MPS).round() as i32,
        heading: (track.round() as i32).rem_euclid(360),
    })
}
