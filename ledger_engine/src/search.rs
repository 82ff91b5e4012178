//! Fields exposed to full-text search collaborators.
//!
//! The engine does not build or query a search index. It only publishes, per entity, the text fields that an
//! indexer is expected to read.
use crate::db_types::{Client, Company, OrderType, Partner, Registrar};

pub trait SearchFields {
    /// Returns `(field name, value)` pairs. Absent optional fields are omitted.
    fn search_fields(&self) -> Vec<(&'static str, &str)>;
}

fn push_opt<'a>(fields: &mut Vec<(&'static str, &'a str)>, name: &'static str, value: Option<&'a String>) {
    if let Some(v) = value {
        fields.push((name, v.as_str()));
    }
}

impl SearchFields for Partner {
    fn search_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("name", self.name.as_str()), ("email", self.email.as_str())];
        push_opt(&mut fields, "phone", self.phone.as_ref());
        fields
    }
}

impl SearchFields for Client {
    fn search_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("name", self.name.as_str()), ("email", self.email.as_str())];
        push_opt(&mut fields, "phone", self.phone.as_ref());
        push_opt(&mut fields, "address", self.address.as_ref());
        fields
    }
}

impl SearchFields for OrderType {
    fn search_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("name", self.name.as_str())];
        push_opt(&mut fields, "description", self.description.as_ref());
        fields
    }
}

impl SearchFields for Company {
    fn search_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }
}

impl SearchFields for Registrar {
    fn search_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;

    #[test]
    fn client_fields_skip_missing_values() {
        let client = Client {
            id: 7,
            name: "Jane Doe".into(),
            email: "jane@example.test".into(),
            phone: None,
            address: Some("1 Main St".into()),
            created_at: Utc::now(),
        };
        assert_eq!(client.search_fields(), vec![
            ("name", "Jane Doe"),
            ("email", "jane@example.test"),
            ("address", "1 Main St")
        ]);
    }

    #[test]
    fn order_type_fields() {
        let ot = OrderType { id: 1, name: "Incorporation".into(), description: Some("New company".into()) };
        assert_eq!(ot.search_fields(), vec![("name", "Incorporation"), ("description", "New company")]);
    }
}
