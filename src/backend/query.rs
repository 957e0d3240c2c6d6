// file: src/backend/query.rs
// description: PostgREST-style table paths with encoded filters
// reference: https://postgrest.org/en/stable/references/api/tables_views.html

use url::form_urlencoded;

pub const REST_PREFIX: &str = "/rest/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(String, String),
    IsNull(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    filters: Vec<Filter>,
    order: Option<String>,
}

impl TableQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    pub fn eq_opt(self, column: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push(Filter::IsNull(column.to_string()));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// `/rest/v1/<table>?col=eq.value&order=col.asc`
    pub fn path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for filter in &self.filters {
            match filter {
                Filter::Eq(column, value) => {
                    query.append_pair(column, &format!("eq.{}", value));
                }
                Filter::IsNull(column) => {
                    query.append_pair(column, "is.null");
                }
            }
        }
        if let Some(column) = &self.order {
            query.append_pair("order", &format!("{}.asc", column));
        }

        let query = query.finish();
        if query.is_empty() {
            format!("{}/{}", REST_PREFIX, self.table)
        } else {
            format!("{}/{}?{}", REST_PREFIX, self.table, query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_table() {
        assert_eq!(TableQuery::table("rooms").path(), "/rest/v1/rooms");
    }

    #[test]
    fn test_values_are_encoded() {
        let path = TableQuery::table("users").eq("email", "ada+1@uni.edu").path();
        assert_eq!(path, "/rest/v1/users?email=eq.ada%2B1%40uni.edu");

        let path = TableQuery::table("departments")
            .eq("name", "Computer Science & Eng")
            .path();
        assert_eq!(
            path,
            "/rest/v1/departments?name=eq.Computer+Science+%26+Eng"
        );
    }

    #[test]
    fn test_null_filter_and_order() {
        let path = TableQuery::table("reactions")
            .eq("evaluation_id", "e1")
            .is_null("comment_id")
            .order_asc("created_at")
            .path();
        assert_eq!(
            path,
            "/rest/v1/reactions?evaluation_id=eq.e1&comment_id=is.null&order=created_at.asc"
        );
    }

    #[test]
    fn test_optional_filter() {
        let path = TableQuery::table("schedules")
            .eq_opt("faculty_id", None)
            .eq_opt("cohort_id", Some("k1"))
            .path();
        assert_eq!(path, "/rest/v1/schedules?cohort_id=eq.k1");
    }
}
