use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::error::TimelineError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Mean month length used for month-zoom pixel math. Dates far from the
/// range start drift against true calendar months; accepted approximation.
pub const MEAN_MONTH_DAYS: f64 = 30.44;

/// Temporal granularity of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl ZoomLevel {
    pub fn all() -> &'static [ZoomLevel] {
        &[ZoomLevel::Hour, ZoomLevel::Day, ZoomLevel::Week, ZoomLevel::Month]
    }

    /// Everything that varies per zoom level, in one table entry.
    pub fn spec(self) -> &'static ZoomSpec {
        &ZOOM_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoomLevel::Hour => "hour",
            ZoomLevel::Day => "day",
            ZoomLevel::Week => "week",
            ZoomLevel::Month => "month",
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomLevel {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(ZoomLevel::Hour),
            "day" => Ok(ZoomLevel::Day),
            "week" => Ok(ZoomLevel::Week),
            "month" => Ok(ZoomLevel::Month),
            other => Err(TimelineError::InvalidZoomLevel(other.to_string())),
        }
    }
}

/// Per-zoom-level constants and formatters.
pub struct ZoomSpec {
    pub level: ZoomLevel,
    pub label: &'static str,
    /// Pixel width of one column (one time unit).
    pub column_width: f64,
    /// Total span of the initial visible range, centered on today.
    pub buffer_days: i64,
    /// Length of one time unit in seconds.
    pub unit_seconds: f64,
    step: fn(NaiveDateTime) -> Option<NaiveDateTime>,
    primary_label: fn(NaiveDateTime) -> String,
    secondary_label: fn(NaiveDateTime) -> String,
}

impl ZoomSpec {
    /// Start of the column after the one starting at `at`.
    pub fn step(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        (self.step)(at)
    }

    pub fn primary_label(&self, at: NaiveDateTime) -> String {
        (self.primary_label)(at)
    }

    pub fn secondary_label(&self, at: NaiveDateTime) -> String {
        (self.secondary_label)(at)
    }
}

static ZOOM_TABLE: [ZoomSpec; 4] = [
    ZoomSpec {
        level: ZoomLevel::Hour,
        label: "Hour",
        column_width: 40.0,
        buffer_days: 3,
        unit_seconds: 3_600.0,
        step: step_hour,
        primary_label: hour_of_day,
        secondary_label: month_and_day,
    },
    ZoomSpec {
        level: ZoomLevel::Day,
        label: "Day",
        column_width: 60.0,
        buffer_days: 30,
        unit_seconds: SECONDS_PER_DAY,
        step: step_day,
        primary_label: day_of_month,
        secondary_label: weekday_name,
    },
    ZoomSpec {
        level: ZoomLevel::Week,
        label: "Week",
        column_width: 120.0,
        buffer_days: 90,
        unit_seconds: 7.0 * SECONDS_PER_DAY,
        step: step_week,
        primary_label: iso_week,
        secondary_label: month_abbrev,
    },
    ZoomSpec {
        level: ZoomLevel::Month,
        label: "Month",
        column_width: 180.0,
        buffer_days: 180,
        unit_seconds: MEAN_MONTH_DAYS * SECONDS_PER_DAY,
        step: step_month,
        primary_label: month_abbrev,
        secondary_label: year,
    },
];

fn step_hour(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.checked_add_signed(Duration::hours(1))
}

fn step_day(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.checked_add_signed(Duration::days(1))
}

fn step_week(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.checked_add_signed(Duration::days(7))
}

// Calendar months, not a fixed day count.
fn step_month(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.checked_add_months(Months::new(1))
}

fn hour_of_day(at: NaiveDateTime) -> String {
    at.format("%-I %p").to_string()
}

fn month_and_day(at: NaiveDateTime) -> String {
    at.format("%b %-d").to_string()
}

fn day_of_month(at: NaiveDateTime) -> String {
    at.format("%-d").to_string()
}

fn weekday_name(at: NaiveDateTime) -> String {
    at.format("%a").to_string()
}

fn iso_week(at: NaiveDateTime) -> String {
    format!("W{}", at.date().iso_week().week())
}

fn month_abbrev(at: NaiveDateTime) -> String {
    at.format("%b").to_string()
}

fn year(at: NaiveDateTime) -> String {
    at.format("%Y").to_string()
}

/// Visible calendar range, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimelineError> {
        if end < start {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// `buffer_days` total span with `today` in the middle.
    pub fn centered_on(today: NaiveDate, buffer_days: i64) -> Self {
        let half = Duration::days(buffer_days / 2);
        Self {
            start: today - half,
            end: today + half,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One header/grid column. Derived data, rebuilt on every zoom or range change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineColumn {
    pub start: NaiveDateTime,
    pub primary_label: String,
    pub secondary_label: String,
    /// Set on the column whose span contains today, so week and month zoom
    /// highlight the period holding today rather than only a column starting on it.
    pub is_today: bool,
    pub is_weekend: bool,
    pub width_px: f64,
}

impl TimelineColumn {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Horizontal placement of a bar, in pixels from the range start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

/// The time-coordinate system: zoom level plus visible range, mapping dates
/// to pixels and back.
///
/// `now` is captured when the zoom or clock is set so that every query between
/// two mutations sees the same "today".
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    zoom: ZoomLevel,
    range: DateRange,
    now: NaiveDateTime,
    columns: Vec<TimelineColumn>,
}

impl TimelineViewport {
    /// Viewport at `zoom`, centered on the local current date.
    pub fn new(zoom: ZoomLevel) -> Self {
        Self::with_clock(zoom, local_now())
    }

    pub fn with_clock(zoom: ZoomLevel, now: NaiveDateTime) -> Self {
        let range = DateRange::centered_on(now.date(), zoom.spec().buffer_days);
        Self::with_range(zoom, range, now)
    }

    pub fn with_range(zoom: ZoomLevel, range: DateRange, now: NaiveDateTime) -> Self {
        let mut viewport = Self {
            zoom,
            range,
            now,
            columns: Vec::new(),
        };
        viewport.rebuild_columns();
        viewport
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Switch zoom level and re-center the visible range on today.
    pub fn set_zoom(&mut self, level: ZoomLevel) {
        self.set_zoom_at(level, local_now());
    }

    pub fn set_zoom_at(&mut self, level: ZoomLevel, now: NaiveDateTime) {
        tracing::debug!(zoom = %level, "zoom changed");
        self.zoom = level;
        self.now = now;
        self.range = DateRange::centered_on(now.date(), level.spec().buffer_days);
        self.rebuild_columns();
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.rebuild_columns();
    }

    /// Re-read the clock; today flags and the today line follow it.
    pub fn refresh_clock(&mut self) {
        self.now = local_now();
        self.rebuild_columns();
    }

    pub fn columns(&self) -> &[TimelineColumn] {
        &self.columns
    }

    pub fn column_width(&self) -> f64 {
        self.zoom.spec().column_width
    }

    /// Columns are laid out back to back, so the canvas is `columns × width`.
    pub fn total_width(&self) -> f64 {
        self.columns.len() as f64 * self.column_width()
    }

    pub fn datetime_to_pixel(&self, at: NaiveDateTime) -> f64 {
        let spec = self.zoom.spec();
        let elapsed = (at - self.origin()).num_seconds() as f64;
        elapsed / spec.unit_seconds * spec.column_width
    }

    pub fn date_to_pixel(&self, date: NaiveDate) -> f64 {
        self.datetime_to_pixel(date.and_time(NaiveTime::MIN))
    }

    /// Inverse of [`datetime_to_pixel`](Self::datetime_to_pixel), floored to a
    /// whole time unit. Multi-day units are rounded to the nearest calendar day.
    ///
    /// Pixels beyond the representable calendar clamp to `NaiveDateTime::MIN`
    /// or `MAX`; NaN maps to the range start.
    pub fn pixel_to_datetime(&self, pixel: f64) -> NaiveDateTime {
        let spec = self.zoom.spec();
        let units = (pixel / spec.column_width).floor();
        // `as i64` saturates and sends NaN to zero.
        let offset = match self.zoom {
            ZoomLevel::Hour => Duration::try_hours(units as i64),
            _ => Duration::try_days((units * spec.unit_seconds / SECONDS_PER_DAY).round() as i64),
        };
        let limit = if units < 0.0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        };
        offset
            .and_then(|offset| self.origin().checked_add_signed(offset))
            .unwrap_or(limit)
    }

    pub fn pixel_to_date(&self, pixel: f64) -> NaiveDate {
        self.pixel_to_datetime(pixel).date()
    }

    /// Bar spanning the interval's full inclusive days.
    pub fn bar_geometry(&self, interval: &Interval) -> BarGeometry {
        let left = self.date_to_pixel(interval.start);
        let right = self.date_to_pixel(interval.end_exclusive());
        BarGeometry {
            left,
            width: right - left,
        }
    }

    /// Position of the today indicator. Hour zoom tracks the current time.
    pub fn today_pixel(&self) -> f64 {
        match self.zoom {
            ZoomLevel::Hour => self.datetime_to_pixel(self.now),
            _ => self.date_to_pixel(self.today()),
        }
    }

    /// Horizontal scroll offset that puts today in the middle of the viewport.
    pub fn centering_scroll_offset(&self, viewport_width: f64) -> f64 {
        (self.today_pixel() - viewport_width / 2.0).max(0.0)
    }

    fn origin(&self) -> NaiveDateTime {
        self.range.start.and_time(NaiveTime::MIN)
    }

    fn rebuild_columns(&mut self) {
        let spec = self.zoom.spec();
        let today = self.today();
        let today_start = today.and_time(NaiveTime::MIN);
        let limit = self
            .range
            .end
            .succ_opt()
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN);

        self.columns.clear();
        let mut current = Some(self.origin());
        while let Some(at) = current.filter(|at| *at < limit) {
            let next = spec.step(at);
            let is_today = at.date() <= today && next.map_or(true, |n| today_start < n);
            self.columns.push(TimelineColumn {
                start: at,
                primary_label: spec.primary_label(at),
                secondary_label: spec.secondary_label(at),
                is_today,
                is_weekend: matches!(at.weekday(), Weekday::Sat | Weekday::Sun),
                width_px: spec.column_width,
            });
            current = next;
        }
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::interval::parse_iso_date;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn at(date: &str, hour: u32) -> NaiveDateTime {
        d(date).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn viewport(zoom: ZoomLevel, start: &str, end: &str, now: NaiveDateTime) -> TimelineViewport {
        TimelineViewport::with_range(zoom, DateRange::new(d(start), d(end)).unwrap(), now)
    }

    #[test]
    fn far_out_pixels_clamp_instead_of_panicking() {
        for zoom in ZoomLevel::all() {
            let vp = viewport(*zoom, "2024-01-01", "2024-01-10", at("2024-01-03", 9));
            assert_eq!(vp.pixel_to_date(1.0e18), NaiveDate::MAX);
            assert_eq!(vp.pixel_to_date(f64::INFINITY), NaiveDate::MAX);
            assert_eq!(vp.pixel_to_date(-1.0e18), NaiveDate::MIN);
            assert_eq!(vp.pixel_to_date(f64::NEG_INFINITY), NaiveDate::MIN);
            assert_eq!(vp.pixel_to_date(f64::NAN), d("2024-01-01"));
        }
    }

    #[test]
    fn day_zoom_position_counts_elapsed_days() {
        let vp = viewport(ZoomLevel::Day, "2024-01-01", "2024-01-10", at("2024-01-03", 9));
        assert_eq!(vp.date_to_pixel(d("2024-01-05")), 4.0 * 60.0);
        assert_eq!(vp.date_to_pixel(d("2024-01-01")), 0.0);
        assert_eq!(vp.columns().len(), 10);
        assert_eq!(vp.total_width(), 600.0);
    }

    #[test]
    fn week_and_month_use_fractional_units() {
        let vp = viewport(ZoomLevel::Week, "2024-01-01", "2024-03-31", at("2024-02-01", 0));
        assert_eq!(vp.date_to_pixel(d("2024-01-15")), 240.0);
        assert!((vp.date_to_pixel(d("2024-01-04")) - 3.0 / 7.0 * 120.0).abs() < 1e-9);

        let vp = viewport(ZoomLevel::Month, "2024-01-01", "2024-06-30", at("2024-02-01", 0));
        let expected = 60.0 / MEAN_MONTH_DAYS * 180.0;
        assert!((vp.date_to_pixel(d("2024-03-01")) - expected).abs() < 1e-9);
    }

    #[test]
    fn hour_zoom_counts_hours() {
        let vp = viewport(ZoomLevel::Hour, "2024-01-01", "2024-01-03", at("2024-01-02", 13));
        assert_eq!(vp.datetime_to_pixel(at("2024-01-01", 5)), 5.0 * 40.0);
        assert_eq!(vp.date_to_pixel(d("2024-01-02")), 24.0 * 40.0);
        assert_eq!(vp.columns().len(), 72);
        assert_eq!(vp.today_pixel(), 37.0 * 40.0);
        assert_eq!(vp.pixel_to_datetime(37.0 * 40.0 + 39.0), at("2024-01-02", 13));
    }

    #[test]
    fn pixel_to_date_floors_to_whole_units() {
        let vp = viewport(ZoomLevel::Day, "2024-01-01", "2024-01-31", at("2024-01-10", 0));
        assert_eq!(vp.pixel_to_date(59.9), d("2024-01-01"));
        assert_eq!(vp.pixel_to_date(60.0), d("2024-01-02"));
        assert_eq!(vp.pixel_to_date(-0.5), d("2023-12-31"));

        let vp = viewport(ZoomLevel::Week, "2024-01-01", "2024-03-31", at("2024-01-10", 0));
        assert_eq!(vp.pixel_to_date(119.0), d("2024-01-01"));
        assert_eq!(vp.pixel_to_date(130.0), d("2024-01-08"));
    }

    #[test]
    fn round_trip_stays_within_one_unit() {
        for &zoom in ZoomLevel::all() {
            let vp = TimelineViewport::with_clock(zoom, at("2024-06-15", 10));
            let range = vp.range();
            let unit_days = zoom.spec().unit_seconds / SECONDS_PER_DAY;
            let mut date = range.start;
            while date <= range.end {
                let back = vp.pixel_to_date(vp.date_to_pixel(date));
                let drift = (date - back).num_days();
                assert!(back <= date, "{zoom}: {back} is after {date}");
                assert!((drift as f64) < unit_days.max(1.0), "{zoom}: {date} came back as {back}");
                if zoom == ZoomLevel::Day || zoom == ZoomLevel::Hour {
                    assert_eq!(back, date, "{zoom} must not cross a day boundary");
                }
                date = date.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn mapping_is_monotonic() {
        for &zoom in ZoomLevel::all() {
            let vp = TimelineViewport::with_clock(zoom, at("2024-06-15", 10));
            let mut date = vp.range().start;
            let mut last = f64::MIN;
            while date <= vp.range().end {
                let px = vp.date_to_pixel(date);
                assert!(px >= last);
                last = px;
                date = date.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn set_zoom_recenters_on_today() {
        let now = at("2024-06-15", 10);
        let mut vp = TimelineViewport::with_clock(ZoomLevel::Day, now);
        assert_eq!(vp.range(), DateRange::new(d("2024-05-31"), d("2024-06-30")).unwrap());
        assert_eq!(vp.columns().len(), 31);

        vp.set_zoom_at(ZoomLevel::Hour, now);
        assert_eq!(vp.range(), DateRange::new(d("2024-06-14"), d("2024-06-16")).unwrap());
        assert_eq!(vp.columns().len(), 72);

        vp.set_zoom_at(ZoomLevel::Week, now);
        assert_eq!(vp.columns().len(), 13);

        vp.set_zoom_at(ZoomLevel::Month, now);
        assert_eq!(vp.range().start, d("2024-03-17"));
        let months: Vec<_> = vp.columns().iter().map(|c| c.primary_label.as_str()).collect();
        assert_eq!(months, ["Mar", "Apr", "May", "Jun", "Jul", "Aug"]);
        assert!(vp.columns().iter().all(|c| c.secondary_label == "2024"));
    }

    #[test]
    fn column_labels_and_flags() {
        let vp = viewport(ZoomLevel::Day, "2024-01-01", "2024-01-07", at("2024-01-03", 8));
        let cols = vp.columns();
        assert_eq!(cols[0].primary_label, "1");
        assert_eq!(cols[0].secondary_label, "Mon");
        assert!(cols[5].is_weekend && cols[6].is_weekend && !cols[4].is_weekend);
        let today: Vec<_> = cols.iter().filter(|c| c.is_today).map(|c| c.date()).collect();
        assert_eq!(today, [d("2024-01-03")]);

        let vp = viewport(ZoomLevel::Week, "2024-01-01", "2024-01-31", at("2024-01-10", 8));
        assert_eq!(vp.columns()[0].primary_label, "W1");
        assert_eq!(vp.columns()[0].secondary_label, "Jan");
        assert!(vp.columns()[1].is_today && !vp.columns()[0].is_today);

        let vp = viewport(ZoomLevel::Hour, "2024-01-01", "2024-01-01", at("2024-01-01", 8));
        assert_eq!(vp.columns()[13].primary_label, "1 PM");
        assert_eq!(vp.columns()[0].primary_label, "12 AM");
        assert_eq!(vp.columns()[0].secondary_label, "Jan 1");
        assert!(vp.columns().iter().all(|c| c.is_today));
    }

    #[test]
    fn bar_spans_inclusive_days() {
        let vp = viewport(ZoomLevel::Day, "2024-01-01", "2024-01-31", at("2024-01-10", 0));
        let bar = vp.bar_geometry(&Interval::parse("2024-01-03", "2024-01-05").unwrap());
        assert_eq!(bar, BarGeometry { left: 120.0, width: 180.0 });

        let vp = viewport(ZoomLevel::Week, "2024-01-01", "2024-03-31", at("2024-01-10", 0));
        let bar = vp.bar_geometry(&Interval::parse("2024-01-08", "2024-01-14").unwrap());
        assert_eq!(bar, BarGeometry { left: 120.0, width: 120.0 });
    }

    #[test]
    fn centering_offset_clamps_at_zero() {
        let vp = TimelineViewport::with_clock(ZoomLevel::Day, at("2024-06-15", 10));
        assert_eq!(vp.today_pixel(), 15.0 * 60.0);
        assert_eq!(vp.centering_scroll_offset(400.0), 700.0);
        assert_eq!(vp.centering_scroll_offset(4000.0), 0.0);
    }

    #[test]
    fn set_range_rebuilds_columns() {
        let mut vp = viewport(ZoomLevel::Day, "2024-01-01", "2024-01-10", at("2024-01-05", 8));
        assert_eq!(vp.columns().len(), 10);

        let range = DateRange::new(d("2024-02-01"), d("2024-02-29")).unwrap();
        vp.set_range(range);
        assert_eq!(vp.columns().len(), 29);
        assert_eq!(vp.columns()[0].date(), d("2024-02-01"));
        assert!(range.contains(d("2024-02-29")));
        assert!(!range.contains(d("2024-03-01")));
        assert!(vp.columns().iter().all(|c| !c.is_today));
    }

    #[test]
    fn zoom_tokens() {
        for &z in ZoomLevel::all() {
            assert_eq!(z.as_str().parse::<ZoomLevel>().unwrap(), z);
        }
        assert_eq!(
            "year".parse::<ZoomLevel>(),
            Err(TimelineError::InvalidZoomLevel("year".into()))
        );
        assert_eq!(
            DateRange::new(d("2024-01-02"), d("2024-01-01")),
            Err(TimelineError::InvalidRange { start: d("2024-01-02"), end: d("2024-01-01") })
        );
    }
}
