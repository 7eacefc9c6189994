//! 绑定参数与渲染测试

#[cfg(test)]
mod binding_tests {
    use chrono::NaiveDate;
    use query_logger::query::{Binding, QueryEvent, StandardQuoter, ValueQuoter};
    use query_logger::{QueryLogError, Result};
    use std::sync::Arc;

    /// 模拟 MySQL 风格的反斜杠转义
    struct BackslashQuoter;

    impl ValueQuoter for BackslashQuoter {
        fn quote(&self, value: &Binding) -> Result<String> {
            match value {
                Binding::Text(s) => Ok(format!("'{}'", s.replace('\'', "\\'"))),
                other => StandardQuoter.quote(other),
            }
        }
    }

    #[test]
    fn test_bindings_from_json() {
        let bindings: Vec<Binding> =
            serde_json::from_str(r#"[1, "a", null, true, 1.5]"#).unwrap();
        assert_eq!(
            bindings,
            vec![
                Binding::Int(1),
                Binding::Text("a".into()),
                Binding::Null,
                Binding::Bool(true),
                Binding::Float(1.5),
            ]
        );
    }

    #[test]
    fn test_numeric_binding_unquoted() {
        let event = QueryEvent::new("select * from t where id = ?", "app").with_bindings([42]);
        assert_eq!(event.render_sql().0, "select * from t where id = 42");
    }

    #[test]
    fn test_mixed_bindings() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let event = QueryEvent::new(
            "update t set name = ?, active = ?, seen_at = ?, note = ? where id = ?",
            "app",
        )
        .with_bindings(vec![
            Binding::from("O'Brien"),
            Binding::from(false),
            Binding::from(at),
            Binding::from(None::<String>),
            Binding::from(9),
        ]);
        assert_eq!(
            event.render_sql().0,
            "update t set name = 'O''Brien', active = 0, seen_at = '2025-01-02 03:04:05', \
             note = NULL where id = 9"
        );
    }

    #[test]
    fn test_connection_quoter_is_used() {
        let event = QueryEvent::new("select ?", "app")
            .with_bindings(["it's"])
            .with_quoter(Arc::new(BackslashQuoter));
        assert_eq!(event.render_sql().0, "select 'it\\'s'");
    }

    #[test]
    fn test_values_with_placeholder_chars() {
        let event = QueryEvent::new("select ? , ?", "app").with_bindings(["?", "%s%%"]);
        let (text, err) = event.render_sql();
        assert_eq!(text, "select '?' , '%s%%'");
        assert!(err.is_none());
    }

    #[test]
    fn test_quoted_bindings_error_index() {
        let event = QueryEvent::new("select ?, ?", "app")
            .with_bindings(vec![Binding::Int(1), Binding::Float(f64::INFINITY)]);
        let err = event.quoted_bindings().unwrap_err();
        assert!(matches!(err, QueryLogError::Quote { index: 1, .. }));
    }
}
