//! Small helpers shared by the pages.

/// `YYYY-MM-DD`, zero padded. `month` is 1-based.
pub fn format_date(year: u32, month: u32, day: u32) -> String {
	format!("{year:04}-{month:02}-{day:02}")
}

/// Today's date in the browser's local time zone.
pub fn today() -> String {
	let now = js_sys::Date::new_0();
	format_date(now.get_full_year(), now.get_month() + 1, now.get_date())
}
