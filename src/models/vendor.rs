#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendor {
    pub id: Option<i64>,
    pub name: String,
    pub cnpj: Option<String>,
}

impl Vendor {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            cnpj: None,
        }
    }

    /// Case-insensitive substring search; an empty query returns everything.
    pub fn search<'a>(vendors: &'a [Vendor], query: &str) -> Vec<&'a Vendor> {
        let q = query.trim().to_lowercase();
        vendors
            .iter()
            .filter(|v| q.is_empty() || v.name.to_lowercase().contains(&q))
            .collect()
    }

    pub fn find_by_id(vendors: &[Vendor], id: i64) -> Option<&Vendor> {
        vendors.iter().find(|v| v.id == Some(id))
    }
}
