mod auth;
mod catalog;
mod common;
mod directory;
mod tenancy;
mod workspace;

pub use auth::{BootstrapRequest, MeResponse};
pub use catalog::{
    ContextTableResponse, GeneralQueryResponse, NavigationResponse, SaveContextTableRequest,
    SaveGeneralQueryRequest, SaveNavigationRequest,
};
pub use common::{CountResponse, HealthResponse, ListQuery, ScopeQuery};
pub use directory::{CreateUserRequest, SetUserActiveRequest, UserResponse};
pub use tenancy::{EntityResponse, MembershipResponse, SaveEntityRequest, TenantSelectionResponse};
pub use workspace::{
    AnalysisResponse, CreateQueryRequest, CreateQueryResultRequest, DashboardResponse,
    QueryResponse, QueryResultResponse, TitleRequest,
};

#[cfg(test)]
mod tests {
    use super::{
        AnalysisResponse, BootstrapRequest, ContextTableResponse, CountResponse,
        CreateQueryRequest, CreateQueryResultRequest, CreateUserRequest, DashboardResponse,
        EntityResponse, GeneralQueryResponse, HealthResponse, MeResponse, MembershipResponse,
        NavigationResponse, QueryResponse, QueryResultResponse, SaveContextTableRequest,
        SaveEntityRequest, SaveGeneralQueryRequest, SaveNavigationRequest, SetUserActiveRequest,
        TenantSelectionResponse, TitleRequest, UserResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AnalysisResponse::export(&config)?;
        BootstrapRequest::export(&config)?;
        ContextTableResponse::export(&config)?;
        CountResponse::export(&config)?;
        CreateQueryRequest::export(&config)?;
        CreateQueryResultRequest::export(&config)?;
        CreateUserRequest::export(&config)?;
        DashboardResponse::export(&config)?;
        EntityResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        GeneralQueryResponse::export(&config)?;
        HealthResponse::export(&config)?;
        MeResponse::export(&config)?;
        MembershipResponse::export(&config)?;
        NavigationResponse::export(&config)?;
        QueryResponse::export(&config)?;
        QueryResultResponse::export(&config)?;
        SaveContextTableRequest::export(&config)?;
        SaveEntityRequest::export(&config)?;
        SaveGeneralQueryRequest::export(&config)?;
        SaveNavigationRequest::export(&config)?;
        SetUserActiveRequest::export(&config)?;
        TenantSelectionResponse::export(&config)?;
        TitleRequest::export(&config)?;
        UserResponse::export(&config)?;

        Ok(())
    }
}
