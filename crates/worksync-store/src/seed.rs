//! Synthetic attendance history

use chrono::{Days, NaiveDate};
use rand::Rng;
use worksync_api::{AttendanceRecord, Roster};
use worksync_config::SeedSettings;
use worksync_util::{is_weekend, RecordId, WallClock};

/// Generate closed records for every roster employee over the
/// `settings.days` calendar days before `today`, oldest first.
///
/// Weekends are skipped unless a `weekend_work_probability` draw succeeds;
/// when a day is worked, every employee works it.
pub fn generate_seed_records<R: Rng + ?Sized>(
    roster: &Roster,
    settings: &SeedSettings,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<AttendanceRecord> {
    let mut records = Vec::new();

    let window_start = settings.check_in_start.as_minutes_from_midnight();
    let window_span = settings
        .check_in_end
        .as_minutes_from_midnight()
        .saturating_sub(window_start)
        .max(1);
    let weekend_probability = settings.weekend_work_probability.clamp(0.0, 1.0);

    for days_back in (1..=settings.days).rev() {
        let Some(date) = today.checked_sub_days(Days::new(days_back as u64)) else {
            continue;
        };

        if is_weekend(date) && !rng.gen_bool(weekend_probability) {
            continue;
        }

        for employee in roster.employees() {
            let check_in_minute = window_start + rng.gen_range(0..window_span);
            let Some(check_in) = WallClock::from_minutes_from_midnight(check_in_minute).on_date(date)
            else {
                continue;
            };

            let mut duration = if settings.max_duration_minutes > settings.min_duration_minutes {
                rng.gen_range(settings.min_duration_minutes..settings.max_duration_minutes)
            } else {
                settings.min_duration_minutes
            };
            if employee.role.eq_ignore_ascii_case(&settings.executive_role) {
                duration += settings.executive_bias_minutes;
            }

            records.push(AttendanceRecord::closed(
                seed_record_id(employee.id.as_str(), date),
                employee.id.clone(),
                check_in,
                duration,
            ));
        }
    }

    records
}

fn seed_record_id(employee_id: &str, date: NaiveDate) -> RecordId {
    RecordId::new(format!("seed-{}-{}", employee_id, date.format("%Y-%m-%d")))
}
