use std::env;
use std::net::SocketAddr;
use tracing::warn;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MIN_APPOINTMENT_MINUTES: i64 = 15;
const DEFAULT_MAX_APPOINTMENT_MINUTES: i64 = 180;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub bind_addr: SocketAddr,
    pub min_appointment_minutes: i64,
    pub max_appointment_minutes: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            min_appointment_minutes: DEFAULT_MIN_APPOINTMENT_MINUTES,
            max_appointment_minutes: DEFAULT_MAX_APPOINTMENT_MINUTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let (min_appointment_minutes, max_appointment_minutes) = duration_bounds(
            minutes_from_env("MIN_APPOINTMENT_MINUTES", DEFAULT_MIN_APPOINTMENT_MINUTES),
            minutes_from_env("MAX_APPOINTMENT_MINUTES", DEFAULT_MAX_APPOINTMENT_MINUTES),
        );

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(addr) => Some(addr),
                    Err(_) => {
                        warn!("BIND_ADDR '{}' is not a socket address, using default", raw);
                        None
                    }
                })
                .unwrap_or(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))),
            min_appointment_minutes,
            max_appointment_minutes,
        };

        if !config.is_configured() {
            warn!("Supabase not configured - falling back to in-memory storage");
        }

        config
    }

    /// True when a remote Supabase project should back the entity store.
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }
}

fn minutes_from_env(key: &str, default: i64) -> i64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} '{}' is not a number, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Keeps configured duration limits inside the range the appointments table
/// accepts (`apt_duration BETWEEN 15 AND 180` in `migrations/0001_init.sql`).
/// Limits may narrow that range but never widen it.
pub fn duration_bounds(min: i64, max: i64) -> (i64, i64) {
    let schema = DEFAULT_MIN_APPOINTMENT_MINUTES..=DEFAULT_MAX_APPOINTMENT_MINUTES;

    let min = if schema.contains(&min) {
        min
    } else {
        warn!("MIN_APPOINTMENT_MINUTES {} is outside {:?}, using {}", min, schema, schema.start());
        *schema.start()
    };
    let max = if schema.contains(&max) {
        max
    } else {
        warn!("MAX_APPOINTMENT_MINUTES {} is outside {:?}, using {}", max, schema, schema.end());
        *schema.end()
    };

    if min > max {
        warn!("Appointment minutes {}..{} are inverted, using defaults", min, max);
        return (*schema.start(), *schema.end());
    }

    (min, max)
}
