use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::aggregate::{
    DailyStatus, HistoryPeriod, MonthlyStats, aggregate_daily, monthly_stats, shift_display_status,
};
use super::geofence::{LocationFix, validate_location};
use crate::error::AttendanceError;
use crate::model::settings::AttendanceSettings;
use crate::model::shift::{ShiftConfig, ShiftRecord, ShiftStatus, ShiftType, is_record_date};
use crate::store::{RecordStore, TeamDirectory};

/// One configured shift as shown on the "today" view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShiftCard {
    pub config: ShiftConfig,
    #[schema(nullable = true)]
    pub record: Option<ShiftRecord>,
    pub display_status: ShiftStatus,
}

/// Check-in, check-out and reporting on top of the record store.
///
/// Holds no state of its own; every read recomputes from the store.
#[derive(Clone)]
pub struct AttendanceService {
    records: Arc<dyn RecordStore>,
    teams: Arc<dyn TeamDirectory>,
    history_limit: u32,
}

impl AttendanceService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        teams: Arc<dyn TeamDirectory>,
        history_limit: u32,
    ) -> Self {
        Self {
            records,
            teams,
            history_limit,
        }
    }

    async fn settings(&self, team_id: Option<u64>) -> Result<Option<AttendanceSettings>, AttendanceError> {
        match team_id {
            Some(team_id) => Ok(self.teams.attendance_settings(team_id).await?),
            None => Ok(None),
        }
    }

    fn check_reference(reference: NaiveDate) -> Result<(), AttendanceError> {
        if is_record_date(reference) {
            Ok(())
        } else {
            Err(AttendanceError::InvalidRecord(format!(
                "reference date {reference} is out of range"
            )))
        }
    }

    async fn check_location(
        &self,
        user_id: u64,
        team_id: Option<u64>,
        fix: &LocationFix,
    ) -> Result<(), AttendanceError> {
        let settings = self.settings(team_id).await?;
        validate_location(settings.as_ref(), fix).inspect_err(|e| {
            warn!(user_id, location = %fix, reason = %e, "Location check rejected");
        })
    }

    #[instrument(skip(self, fix), fields(location = %fix))]
    pub async fn check_in(
        &self,
        user_id: u64,
        team_id: Option<u64>,
        shift_type: ShiftType,
        fix: &LocationFix,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ShiftRecord, AttendanceError> {
        self.check_location(user_id, team_id, fix).await?;

        let existing = self.records.find_record(user_id, today, shift_type).await?;

        if existing.as_ref().is_some_and(|r| r.check_in.is_some()) {
            return Err(AttendanceError::InvalidRecord(format!(
                "already checked in for the {shift_type} shift"
            )));
        }

        let record = ShiftRecord {
            check_in: Some(now),
            location: Some(fix.to_string()),
            status: ShiftStatus::CheckedIn,
            ..existing.unwrap_or_else(|| ShiftRecord::new(user_id, today, shift_type))
        };
        record.validate()?;

        let stored = self.records.upsert_record(&record).await?;
        info!(user_id, record_id = stored.id, %shift_type, "Checked in");
        Ok(stored)
    }

    #[instrument(skip(self, fix), fields(location = %fix))]
    pub async fn check_out(
        &self,
        user_id: u64,
        team_id: Option<u64>,
        record_id: u64,
        fix: &LocationFix,
        now: DateTime<Utc>,
    ) -> Result<ShiftRecord, AttendanceError> {
        self.check_location(user_id, team_id, fix).await?;

        let existing = self
            .records
            .find_by_id(record_id)
            .await?
            .ok_or(AttendanceError::RecordNotFound(record_id))?;

        if existing.user_id != user_id {
            return Err(AttendanceError::Forbidden);
        }
        if existing.check_in.is_none() {
            return Err(AttendanceError::InvalidRecord(
                "cannot check out before checking in".to_string(),
            ));
        }
        if existing.check_out.is_some() {
            return Err(AttendanceError::InvalidRecord("already checked out".to_string()));
        }

        let record = ShiftRecord {
            check_out: Some(now),
            location_out: Some(fix.to_string()),
            status: ShiftStatus::Completed,
            ..existing
        };
        record.validate()?;

        let stored = self.records.upsert_record(&record).await?;
        info!(user_id, record_id = stored.id, shift_type = %stored.shift_type, "Checked out");
        Ok(stored)
    }

    /// One card per shift configured for the team, in schedule order.
    pub async fn today(
        &self,
        user_id: u64,
        team_id: Option<u64>,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<ShiftCard>, AttendanceError> {
        let configs = match team_id {
            Some(team_id) => self.teams.shift_configs(team_id).await?,
            None => Vec::new(),
        };
        let records = self.records.list_records_for_date(user_id, today).await?;

        let cards = configs
            .into_iter()
            .map(|config| {
                let record = records
                    .iter()
                    .find(|r| r.shift_type == config.shift_type)
                    .cloned();
                let display_status = shift_display_status(&config, record.as_ref(), today, now);
                ShiftCard {
                    config,
                    record,
                    display_status,
                }
            })
            .collect();

        Ok(cards)
    }

    pub async fn monthly_stats(
        &self,
        user_id: u64,
        reference: NaiveDate,
    ) -> Result<MonthlyStats, AttendanceError> {
        Self::check_reference(reference)?;
        let records = self.records.list_records(user_id, self.history_limit).await?;
        Ok(monthly_stats(&records, reference))
    }

    pub async fn history(
        &self,
        user_id: u64,
        period: HistoryPeriod,
        reference: NaiveDate,
    ) -> Result<Vec<ShiftRecord>, AttendanceError> {
        Self::check_reference(reference)?;
        let records = self.records.list_records(user_id, self.history_limit).await?;
        Ok(records
            .into_iter()
            .filter(|r| period.contains(r.date, reference))
            .collect())
    }

    pub async fn daily_statuses(
        &self,
        user_id: u64,
        period: HistoryPeriod,
        reference: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, DailyStatus>, AttendanceError> {
        let records = self.history(user_id, period, reference).await?;
        Ok(aggregate_daily(&records))
    }
}
