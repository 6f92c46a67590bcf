use super::{CompiledQuery, Condition};

/// Builder for parameterized SELECT queries over a single table
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    distinct: bool,
    where_clauses: Vec<Condition>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            distinct: false,
            where_clauses: Vec::new(),
        }
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Collapse duplicate rows
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a WHERE condition
    pub fn where_clause(mut self, condition: Condition) -> Self {
        self.where_clauses.push(condition);
        self
    }

    /// Add `field = function(?)` when a value is present
    pub fn where_eq_function(self, field: &str, function: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.where_clause(Condition::eq_function(field, function, value)),
            None => self,
        }
    }

    /// Add `field IN (...)` when the list is non-empty
    pub fn where_in(self, field: &str, values: &[String]) -> Self {
        match Condition::in_list(field, values.to_vec()) {
            Some(condition) => self.where_clause(condition),
            None => self,
        }
    }

    /// Add `field REGEXP ?` when a pattern is present
    pub fn where_regexp(self, field: &str, pattern: Option<&str>) -> Self {
        match pattern {
            Some(pattern) => self.where_clause(Condition::regexp(field, pattern)),
            None => self,
        }
    }

    /// Build the complete SQL text and its argument list in one pass
    pub fn build(&self) -> CompiledQuery {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.select_fields.join(", "));
        sql.push_str(&format!(" FROM {}", self.base_table));

        let mut arguments = Vec::new();
        if !self.where_clauses.is_empty() {
            let mut where_parts = Vec::with_capacity(self.where_clauses.len());
            for clause in &self.where_clauses {
                where_parts.push(clause.to_sql());
                arguments.extend(clause.arguments());
            }
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }

        CompiledQuery::new(sql, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("banners")
            .select(&["port", "service"])
            .distinct()
            .build();

        assert_eq!(query.sql(), "SELECT DISTINCT port, service FROM banners");
        assert!(query.arguments().is_empty());
    }

    #[test]
    fn test_absent_values_add_no_clause() {
        let query = QueryBuilder::new("banners")
            .where_eq_function("ip", "INET_ATON", None)
            .where_in("port", &[])
            .where_regexp("content", None)
            .build();

        assert_eq!(query.sql(), "SELECT * FROM banners");
        assert_eq!(query.placeholder_count(), 0);
    }

    #[test]
    fn test_clauses_joined_with_and() {
        let query = QueryBuilder::new("banners")
            .where_in("service", &["ftp".to_string()])
            .where_regexp("content", Some("vsFTPd"))
            .build();

        assert_eq!(
            query.sql(),
            "SELECT * FROM banners WHERE service IN (?) AND content REGEXP ?"
        );
        assert_eq!(query.arguments(), ["ftp", "vsFTPd"]);
    }
}
