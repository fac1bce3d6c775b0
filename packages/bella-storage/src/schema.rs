pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_members.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_members.sql")),
				"tables/002_member_authorities.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_member_authorities.sql")),
				"tables/003_tokens.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_tokens.sql")),
				"tables/004_admins.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_admins.sql")),
				"tables/005_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_images.sql")),
				"tables/006_infras.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_infras.sql")),
				"tables/007_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_categories.sql")),
				"tables/008_hospitals.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_hospitals.sql")),
				"tables/009_hospital_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_hospital_images.sql")),
				"tables/010_hospital_infras.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_hospital_infras.sql")),
				"tables/011_doctors.sql" =>
					out.push_str(include_str!("../../../sql/tables/011_doctors.sql")),
				"tables/012_doctor_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/012_doctor_categories.sql")),
				"tables/013_careers.sql" =>
					out.push_str(include_str!("../../../sql/tables/013_careers.sql")),
				"tables/014_intro_links.sql" =>
					out.push_str(include_str!("../../../sql/tables/014_intro_links.sql")),
				"tables/015_reviews.sql" =>
					out.push_str(include_str!("../../../sql/tables/015_reviews.sql")),
				"tables/016_review_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/016_review_images.sql")),
				"tables/017_hospital_favorites.sql" =>
					out.push_str(include_str!("../../../sql/tables/017_hospital_favorites.sql")),
				"tables/018_doctor_favorites.sql" =>
					out.push_str(include_str!("../../../sql/tables/018_doctor_favorites.sql")),
				"tables/019_comments.sql" =>
					out.push_str(include_str!("../../../sql/tables/019_comments.sql")),
				"tables/020_comment_likes.sql" =>
					out.push_str(include_str!("../../../sql/tables/020_comment_likes.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
