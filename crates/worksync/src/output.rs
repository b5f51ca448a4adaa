//! Table and JSON rendering for command results

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use worksync_api::{AttendanceRecord, Employee, Granularity, Roster, WorkTimeData};
use worksync_core::CheckState;
use worksync_insight::RefreshOutcome;
use worksync_util::{format_clock_time, format_minutes, EmployeeId};

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn message(&self, text: &str) -> Result<()> {
        if self.json {
            return self.print_json(&json!({ "message": text }));
        }
        println!("{}", text);
        Ok(())
    }

    pub fn logged_in(&self, employee: &Employee, state: &CheckState) -> Result<()> {
        if self.json {
            return self.print_json(&json!({ "employee": employee, "check": state }));
        }
        println!("Welcome, {} ({}, {})", employee.name, employee.role, employee.team);
        println!("{}", describe_state(state));
        Ok(())
    }

    pub fn status(
        &self,
        employee: Option<&Employee>,
        state: &CheckState,
        today: &[AttendanceRecord],
    ) -> Result<()> {
        if self.json {
            return self.print_json(&json!({
                "employee": employee,
                "check": state,
                "today": today,
            }));
        }

        let Some(employee) = employee else {
            println!("Not logged in");
            return Ok(());
        };

        println!("{} [{}] {} / {}", employee.name, employee.id, employee.role, employee.team);
        println!("{}", describe_state(state));

        if today.is_empty() {
            println!("No records today");
            return Ok(());
        }

        println!();
        println!("{:<8} {:<8} {:>8}", "IN", "OUT", "WORKED");
        for record in today {
            let out = record
                .check_out
                .as_ref()
                .map(format_clock_time)
                .unwrap_or_else(|| "--:--".into());
            let worked = record
                .duration
                .map(format_minutes)
                .unwrap_or_else(|| "open".into());
            println!("{:<8} {:<8} {:>8}", format_clock_time(&record.check_in), out, worked);
        }
        Ok(())
    }

    pub fn checked_in(&self, record: &AttendanceRecord) -> Result<()> {
        if self.json {
            return self.print_json(record);
        }
        println!("Checked in at {}", format_clock_time(&record.check_in));
        Ok(())
    }

    pub fn checked_out(&self, record: &AttendanceRecord, duration_minutes: u32) -> Result<()> {
        if self.json {
            return self.print_json(record);
        }
        let at = record
            .check_out
            .as_ref()
            .map(format_clock_time)
            .unwrap_or_default();
        println!("Checked out at {} ({} worked)", at, format_minutes(duration_minutes));
        Ok(())
    }

    pub fn series(
        &self,
        granularity: Granularity,
        employee_id: &EmployeeId,
        rows: &[WorkTimeData],
    ) -> Result<()> {
        if self.json {
            return self.print_json(rows);
        }

        println!("Hours per {} for {}", granularity, employee_id);
        println!(
            "{:<8} {:>9} {:>9} {:>10} {:>9} {:>9} {:>9}",
            "WINDOW", "PERSONAL", "TEAM AVG", "TEAM TOT", "OECD AVG", "OECD MIN", "OECD MAX"
        );
        for row in rows {
            println!(
                "{:<8} {:>9.1} {:>9.1} {:>10.1} {:>9.1} {:>9.1} {:>9.1}",
                row.label,
                row.personal_hours,
                row.team_average_hours,
                row.total_team_hours,
                row.oecd_avg,
                row.oecd_min,
                row.oecd_max
            );
        }
        Ok(())
    }

    pub fn insight(&self, outcome: &RefreshOutcome) -> Result<()> {
        let insight = match outcome {
            RefreshOutcome::Ready(insight) => insight,
            RefreshOutcome::Unavailable | RefreshOutcome::Busy => {
                if self.json {
                    return self.print_json(&json!({ "insight": null }));
                }
                println!("No insight available");
                return Ok(());
            }
        };

        if self.json {
            return self.print_json(&json!({ "insight": insight }));
        }

        println!("Efficiency score: {:.0}/100", insight.efficiency_score);
        println!();
        println!("{}", insight.summary);
        if !insight.recommendations.is_empty() {
            println!();
            for recommendation in &insight.recommendations {
                println!("  - {}", recommendation);
            }
        }
        Ok(())
    }

    pub fn roster(&self, roster: &Roster) -> Result<()> {
        if self.json {
            return self.print_json(roster);
        }
        println!("{:<6} {:<20} {:<24} {}", "CODE", "NAME", "ROLE", "TEAM");
        for employee in roster.employees() {
            println!(
                "{:<6} {:<20} {:<24} {}",
                employee.id.as_str(),
                employee.name,
                employee.role,
                employee.team
            );
        }
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn describe_state(state: &CheckState) -> String {
    match state {
        CheckState::CheckedOut => "Checked out".to_string(),
        CheckState::CheckedIn { since, .. } => {
            format!("Checked in since {}", format_clock_time(since))
        }
    }
}
