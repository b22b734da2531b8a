use async_trait::async_trait;
use riftwatch_common::{Article, ConflictDriver, ConflictType, Features, ParsedEvent, RiskSignal, Severity};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::str::FromStr;

use crate::queue::{Delivery, Queue};
use crate::traits::{Bus, CategoryStats, Result, Store};

/// Postgres-backed implementation of [`Store`]. Wraps a pooled connection;
/// schema is created out-of-band by migrations (not this crate's concern —
/// the database itself is an external collaborator).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Article {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let features_json: serde_json::Value = row.try_get("features")?;
        let features: Features =
            serde_json::from_value(features_json).unwrap_or_else(|_| Features::default());
        let tags_json: serde_json::Value = row.try_get("tags")?;
        let tags: Vec<String> = serde_json::from_value(tags_json).unwrap_or_default();

        Ok(Article {
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            source: row.try_get("source")?,
            url: row.try_get("url")?,
            scraped_at: row.try_get("scraped_at")?,
            published_at: row.try_get("published_at")?,
            author: row.try_get("author")?,
            tags,
            features,
            fingerprint: row.try_get("fingerprint")?,
            veracity_score: row.try_get("veracity_score")?,
            source_count: row.try_get::<i32, _>("source_count")? as u32,
        })
    }
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for ParsedEvent {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let severity_str: String = row.try_get("severity")?;
        let severity = Severity::from_str(&severity_str)
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        let driver_str: Option<String> = row.try_get("conflict_driver")?;
        let conflict_driver = driver_str.and_then(|s| match s.as_str() {
            "Economic" => Some(ConflictDriver::Economic),
            "Environmental" => Some(ConflictDriver::Environmental),
            "Social" => Some(ConflictDriver::Social),
            _ => None,
        });
        let indicators_json: serde_json::Value = row.try_get("hate_speech_indicators")?;
        let hate_speech_indicators: Vec<String> =
            serde_json::from_value(indicators_json).unwrap_or_default();

        Ok(ParsedEvent {
            event_type: row.try_get("event_type")?,
            state: row.try_get("state")?,
            lga: row.try_get("lga")?,
            severity,
            source_title: row.try_get("source_title")?,
            source_url: row.try_get("source_url")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            sentiment_intensity: row
                .try_get::<Option<i32>, _>("sentiment_intensity")?
                .map(|v| v as u8),
            hate_speech_indicators,
            conflict_driver,
            parsed_at: row.try_get("parsed_at")?,
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_article(&self, article: &Article) -> Result<bool> {
        let tags = serde_json::to_value(&article.tags)?;
        let features = serde_json::to_value(&article.features)?;
        let result = sqlx::query(
            r#"
            INSERT INTO articles
                (url, title, content, source, scraped_at, published_at, author,
                 tags, features, fingerprint, veracity_score, source_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (url) DO NOTHING
            "#,
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.source)
        .bind(article.scraped_at)
        .bind(article.published_at)
        .bind(&article.author)
        .bind(tags)
        .bind(features)
        .bind(&article.fingerprint)
        .bind(article.veracity_score)
        .bind(article.source_count as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE url = $1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_unclassified_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.* FROM articles a
            LEFT JOIN parsed_events p ON p.source_url = a.url
            WHERE p.source_url IS NULL
            ORDER BY a.scraped_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_unknown_category_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE features->>'conflict_type' = 'unknown'
            ORDER BY scraped_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_article_category(
        &self,
        url: &str,
        conflict_type: ConflictType,
        confidence: u8,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles
            SET features = jsonb_set(
                    jsonb_set(features, '{conflict_type}', to_jsonb($2::text)),
                    '{confidence}', to_jsonb($3::int)
                )
            WHERE url = $1
            "#,
        )
        .bind(url)
        .bind(serde_json::to_value(conflict_type)?.as_str().unwrap_or("unknown"))
        .bind(confidence as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_parsed_event(&self, event: &ParsedEvent) -> Result<bool> {
        let indicators = serde_json::to_value(&event.hate_speech_indicators)?;
        let driver = event.conflict_driver.map(|d| d.to_string());
        let result = sqlx::query(
            r#"
            INSERT INTO parsed_events
                (event_type, state, lga, severity, source_title, source_url,
                 latitude, longitude, sentiment_intensity, hate_speech_indicators,
                 conflict_driver, parsed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (source_url) DO NOTHING
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.state)
        .bind(&event.lga)
        .bind(event.severity.to_string())
        .bind(&event.source_title)
        .bind(&event.source_url)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.sentiment_intensity.map(|v| v as i32))
        .bind(indicators)
        .bind(driver)
        .bind(event.parsed_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_parsed_event_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<ParsedEvent>> {
        let row = sqlx::query_as::<_, ParsedEvent>(
            "SELECT * FROM parsed_events WHERE source_url = $1",
        )
        .bind(source_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_unscored_parsed_events(&self, limit: i64) -> Result<Vec<ParsedEvent>> {
        let rows = sqlx::query_as::<_, ParsedEvent>(
            r#"
            SELECT pe.* FROM parsed_events pe
            LEFT JOIN risk_signals rs ON rs.source_url = pe.source_url
            WHERE rs.source_url IS NULL
            ORDER BY pe.parsed_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_risk_signal(&self, signal: &RiskSignal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO risk_signals
                (event_type, state, lga, severity, fuel_price, inflation, risk_score,
                 risk_level, source_title, source_url, trigger_reason,
                 flood_inundation_index, precipitation_anomaly, vegetation_health_index,
                 mining_proximity_km, mining_site_name, high_funding_potential,
                 informal_taxation_rate, border_activity, lakurawa_presence,
                 border_permeability_score, group_affiliation, sophisticated_ied_usage,
                 high_escalation_potential, conflict_driver, climate_impact_zone,
                 surge_detected, surge_percentage_increase, latitude, longitude,
                 calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                    $29, $30, $31)
            ON CONFLICT (source_url) DO UPDATE SET
                event_type = EXCLUDED.event_type,
                state = EXCLUDED.state,
                lga = EXCLUDED.lga,
                severity = EXCLUDED.severity,
                fuel_price = EXCLUDED.fuel_price,
                inflation = EXCLUDED.inflation,
                risk_score = EXCLUDED.risk_score,
                risk_level = EXCLUDED.risk_level,
                trigger_reason = EXCLUDED.trigger_reason,
                flood_inundation_index = EXCLUDED.flood_inundation_index,
                precipitation_anomaly = EXCLUDED.precipitation_anomaly,
                vegetation_health_index = EXCLUDED.vegetation_health_index,
                mining_proximity_km = EXCLUDED.mining_proximity_km,
                mining_site_name = EXCLUDED.mining_site_name,
                high_funding_potential = EXCLUDED.high_funding_potential,
                informal_taxation_rate = EXCLUDED.informal_taxation_rate,
                border_activity = EXCLUDED.border_activity,
                lakurawa_presence = EXCLUDED.lakurawa_presence,
                border_permeability_score = EXCLUDED.border_permeability_score,
                group_affiliation = EXCLUDED.group_affiliation,
                sophisticated_ied_usage = EXCLUDED.sophisticated_ied_usage,
                high_escalation_potential = EXCLUDED.high_escalation_potential,
                conflict_driver = EXCLUDED.conflict_driver,
                climate_impact_zone = EXCLUDED.climate_impact_zone,
                surge_detected = EXCLUDED.surge_detected,
                surge_percentage_increase = EXCLUDED.surge_percentage_increase,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                calculated_at = EXCLUDED.calculated_at
            "#,
        )
        .bind(&signal.event_type)
        .bind(&signal.state)
        .bind(&signal.lga)
        .bind(signal.severity.to_string())
        .bind(signal.fuel_price)
        .bind(signal.inflation)
        .bind(signal.risk_score)
        .bind(signal.risk_level.to_string())
        .bind(&signal.source_title)
        .bind(&signal.source_url)
        .bind(&signal.trigger_reason)
        .bind(signal.flood_inundation_index)
        .bind(signal.precipitation_anomaly)
        .bind(signal.vegetation_health_index)
        .bind(signal.mining_proximity_km)
        .bind(&signal.mining_site_name)
        .bind(signal.high_funding_potential)
        .bind(signal.informal_taxation_rate)
        .bind(&signal.border_activity)
        .bind(signal.lakurawa_presence)
        .bind(signal.border_permeability_score)
        .bind(&signal.group_affiliation)
        .bind(signal.sophisticated_ied_usage)
        .bind(signal.high_escalation_potential)
        .bind(signal.conflict_driver.map(|d| d.to_string()))
        .bind(&signal.climate_impact_zone)
        .bind(signal.surge_detected)
        .bind(signal.surge_percentage_increase)
        .bind(signal.latitude)
        .bind(signal.longitude)
        .bind(signal.calculated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_risk_signals(&self, limit: i64) -> Result<Vec<RiskSignal>> {
        let rows = self.list_all_risk_signals_limited(Some(limit)).await?;
        Ok(rows)
    }

    async fn list_all_risk_signals(&self) -> Result<Vec<RiskSignal>> {
        let rows = self.list_all_risk_signals_limited(None).await?;
        Ok(rows)
    }

    async fn count_articles(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS c FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("c")? as u64)
    }

    async fn count_risk_signals(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS c FROM risk_signals")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>("c")? as u64)
    }

    async fn categorization_audit(
        &self,
    ) -> Result<(u64, u64, u64, Vec<(String, CategoryStats)>)> {
        let total = self.count_articles().await?;
        let processed_row = sqlx::query(
            "SELECT COUNT(*) AS c FROM articles WHERE features->>'conflict_type' != 'unknown'",
        )
        .fetch_one(&self.pool)
        .await?;
        let processed = processed_row.try_get::<i64, _>("c")? as u64;
        let remaining = total.saturating_sub(processed);

        let rows = sqlx::query(
            r#"
            SELECT features->>'conflict_type' AS category,
                   COUNT(*) AS count,
                   AVG((features->>'confidence')::float) AS avg_confidence
            FROM articles
            GROUP BY features->>'conflict_type'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut categories = Vec::new();
        for row in rows {
            let category: String = row.try_get("category")?;
            let count: i64 = row.try_get("count")?;
            let avg_confidence: Option<f64> = row.try_get("avg_confidence")?;
            categories.push((
                category,
                CategoryStats {
                    count: count as u64,
                    avg_confidence: avg_confidence.unwrap_or(0.0),
                },
            ));
        }

        Ok((total, processed, remaining, categories))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl PgStore {
    async fn list_all_risk_signals_limited(&self, limit: Option<i64>) -> Result<Vec<RiskSignal>> {
        let query = match limit {
            Some(_) => "SELECT * FROM risk_signals ORDER BY calculated_at DESC LIMIT $1",
            None => "SELECT * FROM risk_signals ORDER BY calculated_at DESC",
        };
        let rows = if let Some(limit) = limit {
            sqlx::query_as::<_, RiskSignal>(query)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, RiskSignal>(query)
                .fetch_all(&self.pool)
                .await?
        };
        Ok(rows)
    }
}

impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for RiskSignal {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let severity_str: String = row.try_get("severity")?;
        let severity = Severity::from_str(&severity_str)
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        let risk_level_str: String = row.try_get("risk_level")?;
        let risk_level = match risk_level_str.as_str() {
            "Minimal" => riftwatch_common::RiskLevel::Minimal,
            "Low" => riftwatch_common::RiskLevel::Low,
            "Medium" => riftwatch_common::RiskLevel::Medium,
            "High" => riftwatch_common::RiskLevel::High,
            _ => riftwatch_common::RiskLevel::Critical,
        };
        let driver_str: Option<String> = row.try_get("conflict_driver")?;
        let conflict_driver = driver_str.and_then(|s| match s.as_str() {
            "Economic" => Some(ConflictDriver::Economic),
            "Environmental" => Some(ConflictDriver::Environmental),
            "Social" => Some(ConflictDriver::Social),
            _ => None,
        });

        Ok(RiskSignal {
            event_type: row.try_get("event_type")?,
            state: row.try_get("state")?,
            lga: row.try_get("lga")?,
            severity,
            fuel_price: row.try_get("fuel_price")?,
            inflation: row.try_get("inflation")?,
            risk_score: row.try_get("risk_score")?,
            risk_level,
            source_title: row.try_get("source_title")?,
            source_url: row.try_get("source_url")?,
            trigger_reason: row.try_get("trigger_reason")?,
            flood_inundation_index: row.try_get("flood_inundation_index")?,
            precipitation_anomaly: row.try_get("precipitation_anomaly")?,
            vegetation_health_index: row.try_get("vegetation_health_index")?,
            mining_proximity_km: row.try_get("mining_proximity_km")?,
            mining_site_name: row.try_get("mining_site_name")?,
            high_funding_potential: row.try_get("high_funding_potential")?,
            informal_taxation_rate: row.try_get("informal_taxation_rate")?,
            border_activity: row.try_get("border_activity")?,
            lakurawa_presence: row.try_get("lakurawa_presence")?,
            border_permeability_score: row.try_get("border_permeability_score")?,
            group_affiliation: row.try_get("group_affiliation")?,
            sophisticated_ied_usage: row.try_get("sophisticated_ied_usage")?,
            high_escalation_potential: row.try_get("high_escalation_potential")?,
            conflict_driver,
            climate_impact_zone: row.try_get("climate_impact_zone")?,
            surge_detected: row.try_get("surge_detected")?,
            surge_percentage_increase: row.try_get("surge_percentage_increase")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            calculated_at: row.try_get("calculated_at")?,
        })
    }
}

/// Postgres-backed [`Bus`]: a durable queue table per `Queue` variant with
/// `SELECT ... FOR UPDATE SKIP LOCKED` standing in for broker-level
/// consumer dispatch, and an explicit ack/nack column rather than a
/// connection-scoped delivery tag.
#[derive(Clone)]
pub struct PgBus {
    pool: PgPool,
}

impl PgBus {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(broker_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(broker_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Bus for PgBus {
    async fn publish(&self, queue: Queue, payload: serde_json::Value) -> Result<()> {
        sqlx::query(
            "INSERT INTO bus_messages (queue, payload, status) VALUES ($1, $2, 'pending')",
        )
        .bind(queue.as_str())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume(&self, queue: Queue) -> Result<Option<Delivery>> {
        let row = sqlx::query(
            r#"
            UPDATE bus_messages
            SET status = 'in_flight'
            WHERE id = (
                SELECT id FROM bus_messages
                WHERE queue = $1 AND status = 'pending'
                ORDER BY id ASC
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING id, payload
            "#,
        )
        .bind(queue.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Delivery {
            tag: r.get::<i64, _>("id"),
            payload: r.get::<serde_json::Value, _>("payload"),
        }))
    }

    async fn ack(&self, _queue: Queue, tag: i64) -> Result<()> {
        sqlx::query("DELETE FROM bus_messages WHERE id = $1")
            .bind(tag)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn nack(&self, _queue: Queue, tag: i64) -> Result<()> {
        sqlx::query("UPDATE bus_messages SET status = 'dead' WHERE id = $1")
            .bind(tag)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
