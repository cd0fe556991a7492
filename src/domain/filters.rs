//! Dashboard filter state - the query parameters shaping a data request

use chrono::Datelike;
use serde::Serialize;
use thiserror::Error;

/// French month names, indexed by `month - 1`
pub const MONTHS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

pub const WEEKS_PER_MONTH: u8 = 4;

/// Period granularity of the reported data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Weekly,
    Monthly,
    Yearly,
}

impl ViewType {
    /// Value sent as `view_type` on the wire
    pub fn as_param(&self) -> &'static str {
        match self {
            ViewType::Weekly => "weekly",
            ViewType::Monthly => "monthly",
            ViewType::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewType::Weekly => "Hebdomadaire",
            ViewType::Monthly => "Mensuelle",
            ViewType::Yearly => "Annuelle",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" | "hebdomadaire" => Some(ViewType::Weekly),
            "monthly" | "month" | "m" | "mensuelle" => Some(ViewType::Monthly),
            "yearly" | "year" | "y" | "annuelle" => Some(ViewType::Yearly),
            _ => None,
        }
    }

    fn next(&self) -> Self {
        match self {
            ViewType::Weekly => ViewType::Monthly,
            ViewType::Monthly => ViewType::Yearly,
            ViewType::Yearly => ViewType::Weekly,
        }
    }
}

/// Whether reported values are totals or averages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    Total,
    Average,
}

impl DisplayType {
    /// Value sent as `display_type` on the wire
    pub fn as_param(&self) -> &'static str {
        match self {
            DisplayType::Total => "total",
            DisplayType::Average => "average",
        }
    }

    /// Prefix used in titles and selectors
    pub fn label(&self) -> &'static str {
        match self {
            DisplayType::Total => "Total",
            DisplayType::Average => "Moyenne",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "total" | "t" => Some(DisplayType::Total),
            "average" | "avg" | "moyenne" | "a" => Some(DisplayType::Average),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{field} hors limites: {value} (attendu {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Current filter values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub view: ViewType,
    pub display_type: DisplayType,
    /// 1..=4, only meaningful for [`ViewType::Weekly`]
    pub selected_week: u8,
    /// 1..=12, ignored for [`ViewType::Yearly`]
    pub selected_month: u8,
    pub selected_year: i32,
}

impl FilterState {
    /// Monthly totals for the given calendar month
    pub fn for_month(month: u8, year: i32) -> Self {
        Self {
            view: ViewType::Monthly,
            display_type: DisplayType::Total,
            selected_week: 1,
            selected_month: month.clamp(1, 12),
            selected_year: year,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::for_month(today.month() as u8, today.year())
    }
}

/// Query string parameters for `GET /api/dashboard/data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardQuery {
    pub view_type: &'static str,
    pub display_type: &'static str,
    pub week: u8,
    pub month: u8,
    pub year: i32,
}

/// Filter store with one typed setter per field.
///
/// Every effective change bumps `revision`; the app compares it against the
/// revision of the last issued fetch to decide when to reload.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
    revision: u64,
}

impl FilterStore {
    pub fn new(state: FilterState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_view(&mut self, view: ViewType) {
        if self.state.view != view {
            self.state.view = view;
            self.revision += 1;
        }
    }

    pub fn set_display_type(&mut self, display_type: DisplayType) {
        if self.state.display_type != display_type {
            self.state.display_type = display_type;
            self.revision += 1;
        }
    }

    pub fn set_week(&mut self, week: u8) -> Result<(), FilterError> {
        check_range("semaine", week as i64, 1, WEEKS_PER_MONTH as i64)?;
        if self.state.selected_week != week {
            self.state.selected_week = week;
            self.revision += 1;
        }
        Ok(())
    }

    pub fn set_month(&mut self, month: u8) -> Result<(), FilterError> {
        check_range("mois", month as i64, 1, 12)?;
        if self.state.selected_month != month {
            self.state.selected_month = month;
            self.revision += 1;
        }
        Ok(())
    }

    pub fn set_year(&mut self, year: i32) {
        if self.state.selected_year != year {
            self.state.selected_year = year;
            self.revision += 1;
        }
    }

    pub fn cycle_view(&mut self) {
        self.set_view(self.state.view.next());
    }

    pub fn toggle_display_type(&mut self) {
        let next = match self.state.display_type {
            DisplayType::Total => DisplayType::Average,
            DisplayType::Average => DisplayType::Total,
        };
        self.set_display_type(next);
    }

    pub fn step_week(&mut self, forward: bool) {
        let week = wrap_step(self.state.selected_week, WEEKS_PER_MONTH, forward);
        self.state.selected_week = week;
        self.revision += 1;
    }

    pub fn step_month(&mut self, forward: bool) {
        let month = wrap_step(self.state.selected_month, 12, forward);
        self.state.selected_month = month;
        self.revision += 1;
    }

    pub fn step_year(&mut self, forward: bool) {
        let year = if forward {
            self.state.selected_year.saturating_add(1)
        } else {
            self.state.selected_year.saturating_sub(1)
        };
        self.set_year(year);
    }

    pub fn query(&self) -> DashboardQuery {
        DashboardQuery {
            view_type: self.state.view.as_param(),
            display_type: self.state.display_type.as_param(),
            week: self.state.selected_week,
            month: self.state.selected_month,
            year: self.state.selected_year,
        }
    }

    pub fn dynamic_title(&self) -> String {
        dynamic_title(&self.state)
    }
}

/// Human readable title for a filter state
pub fn dynamic_title(state: &FilterState) -> String {
    let month = month_name(state.selected_month).unwrap_or("?");
    let period = match state.view {
        ViewType::Weekly => format!(
            "Semaine {} de {} {}",
            state.selected_week, month, state.selected_year
        ),
        ViewType::Monthly => format!("{} {}", month, state.selected_year),
        ViewType::Yearly => format!("Année {}", state.selected_year),
    };
    format!(
        "Dashboard KPI Sécurité - {} - {}",
        state.display_type.label(),
        period
    )
}

pub fn month_name(month: u8) -> Option<&'static str> {
    MONTHS.get((month as usize).checked_sub(1)?).copied()
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), FilterError> {
    if value < min || value > max {
        return Err(FilterError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn wrap_step(value: u8, max: u8, forward: bool) -> u8 {
    if forward {
        if value >= max {
            1
        } else {
            value + 1
        }
    } else if value <= 1 {
        max
    } else {
        value - 1
    }
}
