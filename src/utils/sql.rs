//! Dynamic `WHERE` clauses for list endpoints.
//!
//! Filter values are always bound as text parameters (`$1`, `$2`, ...).
//! Only column names and fixed SQL fragments are formatted into the query.

#[derive(Debug, Default, Clone)]
pub struct Filters {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    fn placeholder(&mut self, value: String) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    /// `column = $n`
    pub fn eq(&mut self, column: &str, value: impl Into<String>) -> &mut Self {
        let p = self.placeholder(value.into());
        self.clauses.push(format!("{} = {}", column, p));
        self
    }

    /// `column = $n::<cast>`, for non-text columns such as `uuid`.
    pub fn eq_cast(&mut self, column: &str, value: impl Into<String>, cast: &str) -> &mut Self {
        let p = self.placeholder(value.into());
        self.clauses.push(format!("{} = {}::{}", column, p, cast));
        self
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn search(&mut self, columns: &[&str], term: &str) -> &mut Self {
        let p = self.placeholder(format!("%{}%", term));
        let any = columns
            .iter()
            .map(|c| format!("{} ILIKE {}", c, p))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.clauses.push(format!("({})", any));
        self
    }

    /// A fixed condition without parameters.
    pub fn raw(&mut self, clause: &str) -> &mut Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// `" WHERE a AND b"`, or an empty string without filters.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(Filters::new().where_clause(), "");
        assert!(Filters::new().params().is_empty());
    }

    #[test]
    fn test_placeholders_are_numbered_in_order() {
        let mut filters = Filters::new();
        filters
            .eq("status", "pending")
            .raw("is_active = TRUE")
            .eq_cast("student_id", "0b6f0c3e-6a4e-4d55-9d5f-1f1ad3f6a001", "uuid")
            .search(&["name", "admission_number"], "asha");

        assert_eq!(
            filters.where_clause(),
            " WHERE status = $1 AND is_active = TRUE AND student_id = $2::uuid \
             AND (name ILIKE $3 OR admission_number ILIKE $3)"
        );
        assert_eq!(filters.params()[2], "%asha%");
    }
}
