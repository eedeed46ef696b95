//! Date-range planning and option label formatting for the booking form.

use crate::api::{AvailableGuest, Room};
use chrono::{NaiveDate, NaiveDateTime};
use core::cmp::Ordering;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// What to do with the current contents of the two date fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayPlan {
	/// At least one field is empty (or unreadable). Nothing happens.
	Incomplete,
	/// Check-in lies after check-out.
	Reversed,
	/// Query availability and price each room for this many nights.
	Query { nights: i64 },
}

/// Accepts `date` (`2024-05-01`) and `datetime-local` (`2024-05-01T14:00`) input values.
fn parse_input(value: &str) -> Option<NaiveDateTime> {
	NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
		.or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
		.ok()
		.or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().and_then(|date| date.and_hms_opt(0, 0, 0)))
}

#[must_use]
pub fn plan_stay(check_in: &str, check_out: &str) -> StayPlan {
	if check_in.is_empty() || check_out.is_empty() {
		return StayPlan::Incomplete;
	}

	match (parse_input(check_in), parse_input(check_out)) {
		(Some(from), Some(to)) => match from.cmp(&to) {
			Ordering::Greater => StayPlan::Reversed,
			_ => StayPlan::Query { nights: ceil_days((to - from).num_seconds()) },
		},
		// Unparseable values still order lexicographically, the same way the inputs submit them.
		_ if check_in > check_out => StayPlan::Reversed,
		_ => StayPlan::Incomplete,
	}
}

fn ceil_days(seconds: i64) -> i64 {
	seconds / SECONDS_PER_DAY + i64::from(seconds % SECONDS_PER_DAY > 0)
}

/// Two decimals with a comma separator, as in `R$ 300,00`. Exact half cents round up.
#[must_use]
pub fn currency(amount: f64) -> String {
	let cents = (amount * 100.0).round() / 100.0;
	format!("R$ {:.2}", cents).replace('.', ",")
}

/// Groups a CPF into `xxx.xxx.xxx.xx`. Shorter values keep whatever groups they fill.
#[must_use]
pub fn document_number(cpf: &str) -> String {
	let digits: Vec<char> = cpf.chars().collect();
	let (head, tail) = digits.split_at(digits.len().min(9));
	let mut groups: Vec<String> = head.chunks(3).map(|group| group.iter().collect()).collect();
	if !tail.is_empty() {
		groups.push(tail.iter().collect());
	}
	groups.join(".")
}

#[must_use]
pub fn room_option_label(room: &Room, nights: i64) -> String {
	#[allow(clippy::cast_precision_loss)]
	let total = room.nightly_price() * nights as f64;
	format!(
		"Quarto: {} - {} adultos, {} crianças - {} / diária (Total: {})",
		room.room_number,
		room.adults(),
		room.children(),
		currency(room.nightly_price()),
		currency(total)
	)
}

#[must_use]
pub fn catalog_option_label(room: &Room) -> String {
	format!("{} - {} adultos, {} crianças - {}", room.room_number, room.adults(), room.children(), currency(room.nightly_price()))
}

#[must_use]
pub fn guest_option_label(guest: &AvailableGuest) -> String {
	format!("{} -> {}", guest.name, document_number(&guest.cpf))
}
