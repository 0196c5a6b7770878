const INIT: &str = include_str!("../../../sql/init.sql");
const TABLES: [(&str, &str); 4] = [
	("tables/001_projects.sql", include_str!("../../../sql/tables/001_projects.sql")),
	("tables/002_sources.sql", include_str!("../../../sql/tables/002_sources.sql")),
	("tables/003_notes.sql", include_str!("../../../sql/tables/003_notes.sql")),
	("tables/004_jobs.sql", include_str!("../../../sql/tables/004_jobs.sql")),
];

/// Expands the `\ir` includes of `sql/init.sql` into one script.
pub fn render_schema() -> crate::Result<String> {
	let mut out = String::new();

	for line in INIT.lines() {
		if let Some(path) = line.trim().strip_prefix("\\ir ") {
			let path = path.trim();
			let Some((_, sql)) = TABLES.iter().find(|(name, _)| *name == path) else {
				return Err(crate::Error::UnknownInclude(path.to_string()));
			};

			out.push_str(sql);
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	Ok(out)
}

/// Splits a rendered script into executable statements.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}
