pub(crate) fn group_thousands(value: i64) -> String {
	let sign = if value < 0 { "-" } else { "" };

	format!("{sign}{}", group_digits(value.unsigned_abs()))
}

pub(crate) fn currency(value: i64) -> String {
	let sign = if value < 0 { "-" } else { "" };

	format!("{sign}${}", group_digits(value.unsigned_abs()))
}

fn group_digits(value: u64) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);

	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}

		out.push(ch);
	}

	out
}
