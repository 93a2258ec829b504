//! `cloud_agent.Agent` service over the query server

use tonic::Request;
use tonic::Response;
use tonic::Status;
use tracing::debug;

use super::proto::agent_server::Agent;
use super::proto::CacheStatus;
use super::proto::ShootsRequest;
use super::proto::ShootsResponse;
use crate::metrics::QUERY_REQUESTS;
use crate::QueryServer;
use crate::ShootFilter;
use crate::ShootList;

pub struct InventoryService {
    query: QueryServer<ShootList>,
}

impl InventoryService {
    pub fn new(query: QueryServer<ShootList>) -> Self {
        Self { query }
    }
}

impl std::fmt::Debug for InventoryService {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("InventoryService")
            .field("sources", &self.query.sources())
            .finish()
    }
}

#[tonic::async_trait]
impl Agent for InventoryService {
    /// Answers from the cache only. Unknown and unpopulated sources are
    /// reported in the response status, never as a gRPC error.
    #[tracing::instrument(skip(self))]
    async fn gardener_shoots(
        &self,
        request: Request<ShootsRequest>,
    ) -> std::result::Result<Response<ShootsResponse>, Status> {
        let request = request.into_inner();

        // An empty owner means no owner filter
        let filter = ShootFilter {
            created_by: request.created_by.filter(|owner| !owner.is_empty()),
        };

        let response = match self.query.query(&request.source, &filter) {
            Ok(list) => ShootsResponse::populated(&list),
            Err(e) => {
                debug!(source = %request.source, "query not served: {}", e);
                ShootsResponse::from(e)
            }
        };

        QUERY_REQUESTS
            .with_label_values(&[status_label(response.status())])
            .inc();

        Ok(Response::new(response))
    }
}

fn status_label(status: CacheStatus) -> &'static str {
    match status {
        CacheStatus::Populated => "populated",
        CacheStatus::NotYetPopulated => "not_yet_populated",
        CacheStatus::UnknownSource => "unknown_source",
    }
}
