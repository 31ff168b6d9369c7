use insightdeck_core::{AppResult, Principal};
use insightdeck_domain::{ChartType, DEFAULT_PAGE_SIZE, PageRequest, TenantSelection};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Number of records visible to the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/count-response.ts"
)]
pub struct CountResponse {
    pub count: i64,
}

/// Tenant-selection override accepted by every protected route.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub entity_id: Option<i64>,
}

impl ScopeQuery {
    /// Normalizes the override for the caller's role.
    pub fn selection(&self, principal: &Principal) -> AppResult<Option<TenantSelection>> {
        TenantSelection::from_request(principal.role(), self.entity_id)
    }
}

/// Scope and paging parameters for list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub entity_id: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListQuery {
    pub fn selection(&self, principal: &Principal) -> AppResult<Option<TenantSelection>> {
        TenantSelection::from_request(principal.role(), self.entity_id)
    }

    /// Page to serve, defaulting to the first page of the default size.
    pub fn page_request(&self) -> AppResult<PageRequest> {
        PageRequest::new(self.page.unwrap_or(1), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Page to serve only when the caller asked for one.
    pub fn optional_page_request(&self) -> AppResult<Option<PageRequest>> {
        if self.page.is_none() && self.size.is_none() {
            return Ok(None);
        }

        self.page_request().map(Some)
    }
}

pub(super) fn parse_chart(value: Option<&str>) -> AppResult<Option<ChartType>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<ChartType>)
        .transpose()
}

pub(super) fn parse_charts(values: &[String]) -> AppResult<Vec<ChartType>> {
    values
        .iter()
        .map(|value| value.parse::<ChartType>())
        .collect()
}

pub(super) fn chart_names(values: &[ChartType]) -> Vec<String> {
    values
        .iter()
        .map(|chart| chart.as_str().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use insightdeck_core::{AppError, Principal, Role, UserId};
    use insightdeck_domain::TenantSelection;

    use super::ListQuery;

    #[test]
    fn list_query_defaults_to_first_page() {
        let page = ListQuery::default()
            .page_request()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(page.page(), 1);
        assert_eq!(page.size(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn optional_page_is_absent_without_parameters() {
        assert!(matches!(
            ListQuery::default().optional_page_request(),
            Ok(None)
        ));

        let query = ListQuery {
            size: Some(5),
            ..ListQuery::default()
        };
        assert_eq!(
            query
                .optional_page_request()
                .ok()
                .flatten()
                .map(|page| page.size()),
            Some(5)
        );
    }

    #[test]
    fn zero_page_is_rejected() {
        let query = ListQuery {
            page: Some(0),
            ..ListQuery::default()
        };
        assert!(matches!(query.page_request(), Err(AppError::Validation(_))));
    }

    #[test]
    fn override_is_ignored_below_super_admin() {
        let admin = Principal::new(UserId::from_i64(1), Role::Admin, true);
        let super_admin = Principal::new(UserId::from_i64(2), Role::SuperAdmin, true);
        let query = ListQuery {
            entity_id: Some(4),
            ..ListQuery::default()
        };

        assert!(matches!(query.selection(&admin), Ok(None)));
        assert!(matches!(
            query.selection(&super_admin),
            Ok(Some(TenantSelection::Entity(entity_id))) if entity_id.as_i64() == 4
        ));
    }
}
