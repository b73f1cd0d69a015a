//! Core multi-tenant types for BizFlow.

use std::fmt;

/// A tenant identifier.
///
/// Seeded tenants use small numeric ids ("1", "2", ...); ids handed out at
/// runtime continue that sequence and are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of business a tenant runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BusinessType {
    Hotel,
    Supermarket,
    Shop,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Hotel => "hotel",
            BusinessType::Supermarket => "supermarket",
            BusinessType::Shop => "shop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hotel" => Some(BusinessType::Hotel),
            "supermarket" => Some(BusinessType::Supermarket),
            "shop" => Some(BusinessType::Shop),
            _ => None,
        }
    }
}

/// One independently managed business account.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub business_type: BusinessType,
    pub owner: String,
    pub active: bool,
}

/// A tenant before the directory has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewTenant {
    pub name: String,
    pub business_type: BusinessType,
    pub owner: String,
    pub active: bool,
}

impl NewTenant {
    pub fn new(name: impl Into<String>, business_type: BusinessType, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            business_type,
            owner: owner.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Tenant name must not be empty".to_string());
        }
        if self.owner.trim().is_empty() {
            return Err("Tenant owner must not be empty".to_string());
        }
        Ok(())
    }
}

/// Append-only, ordered tenant collection.
///
/// Insertion order is preserved: the first tenant is the default selection
/// after login. Ids come from a monotonic counter, so an id is never handed
/// out twice even if a future version allows removal.
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    tenants: Vec<Tenant>,
    next_id: u64,
}

impl Default for TenantDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantDirectory {
    pub fn new() -> Self {
        Self {
            tenants: Vec::new(),
            next_id: 1,
        }
    }

    /// Directory preloaded with `tenants`; the id counter starts after the
    /// highest numeric id among them.
    pub fn with_tenants(tenants: Vec<Tenant>) -> Self {
        let highest = tenants
            .iter()
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            tenants,
            next_id: highest + 1,
        }
    }

    /// The three demo businesses.
    pub fn seeded() -> Self {
        let seed = |id: &str, name: &str, business_type, owner: &str| Tenant {
            id: TenantId::from(id),
            name: name.to_string(),
            business_type,
            owner: owner.to_string(),
            active: true,
        };
        Self::with_tenants(vec![
            seed("1", "Downtown Hotel", BusinessType::Hotel, "John Smith"),
            seed("2", "Corner Supermarket", BusinessType::Supermarket, "Sarah Johnson"),
            seed("3", "Fashion Boutique", BusinessType::Shop, "Mike Rodriguez"),
        ])
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    pub fn first(&self) -> Option<&Tenant> {
        self.tenants.first()
    }

    pub fn get(&self, id: &TenantId) -> Option<&Tenant> {
        self.tenants.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TenantId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.iter()
    }

    pub fn as_slice(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn active_count(&self) -> usize {
        self.tenants.iter().filter(|t| t.active).count()
    }

    /// Append a tenant under a freshly assigned id and return it.
    ///
    /// Does not validate; callers run [`NewTenant::validate`] first.
    pub fn insert(&mut self, new: NewTenant) -> Tenant {
        let id = self.allocate_id();
        let tenant = Tenant {
            id,
            name: new.name,
            business_type: new.business_type,
            owner: new.owner,
            active: new.active,
        };
        self.tenants.push(tenant.clone());
        tenant
    }

    fn allocate_id(&mut self) -> TenantId {
        loop {
            let candidate = TenantId(self.next_id.to_string());
            self.next_id += 1;
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_order() {
        let dir = TenantDirectory::seeded();
        let names: Vec<_> = dir.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Downtown Hotel", "Corner Supermarket", "Fashion Boutique"]);
        assert_eq!(dir.first().map(|t| t.id.as_str()), Some("1"));
        assert_eq!(dir.active_count(), 3);
    }

    #[test]
    fn insert_continues_after_highest_seeded_id() {
        let mut dir = TenantDirectory::seeded();
        let added = dir.insert(NewTenant::new("Airport Kiosk", BusinessType::Shop, "Ana Lee"));
        assert_eq!(added.id, TenantId::from("4"));
        assert_eq!(dir.len(), 4);
        assert_eq!(dir.get(&added.id), Some(&added));
    }

    #[test]
    fn ids_skip_values_already_taken() {
        let taken = Tenant {
            id: TenantId::from("2"),
            name: "Pre-existing".into(),
            business_type: BusinessType::Hotel,
            owner: "Someone".into(),
            active: false,
        };
        let odd = Tenant {
            id: TenantId::from("hq"),
            ..taken.clone()
        };
        let mut dir = TenantDirectory::with_tenants(vec![odd, taken]);
        let a = dir.insert(NewTenant::new("A", BusinessType::Shop, "x"));
        let b = dir.insert(NewTenant::new("B", BusinessType::Shop, "y"));
        assert_eq!(a.id.as_str(), "3");
        assert_eq!(b.id.as_str(), "4");
        assert_eq!(dir.active_count(), 2);
    }

    #[test]
    fn default_directory_starts_at_one() {
        let mut dir = TenantDirectory::default();
        let first = dir.insert(NewTenant::new("Lakeside Inn", BusinessType::Hotel, "Priya Patel"));
        assert_eq!(first.id, TenantId::from("1"));
        assert_eq!(dir.insert(NewTenant::new("Kiosk", BusinessType::Shop, "Dana Lee")).id.as_str(), "2");
    }

    #[test]
    fn new_tenant_validation() {
        assert!(NewTenant::new("Cafe", BusinessType::Shop, "Jo").validate().is_ok());
        assert!(NewTenant::new("  ", BusinessType::Shop, "Jo").validate().is_err());
        assert!(NewTenant::new("Cafe", BusinessType::Shop, "").validate().is_err());
    }

    #[test]
    fn business_type_parse() {
        assert_eq!(BusinessType::parse(" Hotel "), Some(BusinessType::Hotel));
        assert_eq!(BusinessType::parse("bakery"), None);
        assert_eq!(BusinessType::Supermarket.as_str(), "supermarket");
    }
}
