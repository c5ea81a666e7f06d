use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, PersistentVolumeClaim, Pod, ServiceAccount};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, api::ListParams};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

#[cfg(test)]
use mockall::automock;

use super::Scope;
use crate::error::Error;

/// Timeout for connecting to K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading K8s API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Cluster calls needed to build wider pod records
///
/// List calls are the bulk inputs and fail the whole run. The `get_*` calls
/// back the per-pod fallback when a resource is missing from a bulk list;
/// `Ok(None)` means the resource does not exist.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_pods(&self, scope: &Scope, label_selector: &str) -> Result<Vec<Pod>, Error>;

    async fn list_nodes(&self) -> Result<Vec<Node>, Error>;

    async fn list_service_accounts(&self, scope: &Scope) -> Result<Vec<ServiceAccount>, Error>;

    async fn list_pvcs(&self, scope: &Scope) -> Result<Vec<PersistentVolumeClaim>, Error>;

    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ServiceAccount>, Error>;

    async fn get_pvc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<PersistentVolumeClaim>, Error>;
}

/// [`ClusterApi`] backed by a real kube client
pub struct KubeClusterApi {
    client: Client,
    default_namespace: String,
}

impl KubeClusterApi {
    /// Build a client for the given kubeconfig context (or the current one)
    ///
    /// No request is sent here; the first cluster call happens on the first list.
    pub async fn connect(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Self, Error> {
        let kubeconfig = match kubeconfig {
            Some(path) => Kubeconfig::read_from(path).map_err(|e| {
                Error::config(format!("failed to read kubeconfig {}: {}", path.display(), e))
            })?,
            None => Kubeconfig::read()
                .map_err(|e| Error::config(format!("failed to load kubeconfig: {}", e)))?,
        };

        if let Some(ctx) = context
            && !kubeconfig.contexts.iter().any(|c| c.name == ctx)
        {
            return Err(Error::config(format!(
                "context '{}' not found in kubeconfig",
                ctx
            )));
        }

        let mut config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| Error::config(format!("failed to load kubeconfig: {}", e)))?;

        config.connect_timeout = Some(CONNECT_TIMEOUT);
        config.read_timeout = Some(READ_TIMEOUT);

        let default_namespace = config.default_namespace.clone();
        let client = Client::try_from(config)
            .map_err(|e| Error::config(format!("failed to create client: {}", e)))?;

        debug!(context = ?context, namespace = %default_namespace, "Created kube client");

        Ok(Self {
            client,
            default_namespace,
        })
    }

    /// Namespace of the selected kubeconfig context ("default" if unset)
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    fn scoped<K>(&self, scope: &Scope) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        match scope {
            Scope::Namespace(ns) => Api::namespaced(self.client.clone(), ns),
            Scope::AllNamespaces => Api::all(self.client.clone()),
        }
    }
}

fn build_list_params(label_selector: &str) -> ListParams {
    let mut params = ListParams::default();
    if !label_selector.is_empty() {
        params = params.labels(label_selector);
    }
    trace!(label_selector = %label_selector, "Built ListParams");
    params
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_pods(&self, scope: &Scope, label_selector: &str) -> Result<Vec<Pod>, Error> {
        let api: Api<Pod> = self.scoped(scope);
        let list = api
            .list(&build_list_params(label_selector))
            .await
            .map_err(Error::list("pods"))?;
        debug!(scope = %scope, count = list.items.len(), "Listed pods");
        Ok(list.items)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, Error> {
        let api: Api<Node> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(Error::list("nodes"))?;
        debug!(count = list.items.len(), "Listed nodes");
        Ok(list.items)
    }

    async fn list_service_accounts(&self, scope: &Scope) -> Result<Vec<ServiceAccount>, Error> {
        let api: Api<ServiceAccount> = self.scoped(scope);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(Error::list("ServiceAccounts"))?;
        debug!(scope = %scope, count = list.items.len(), "Listed service accounts");
        Ok(list.items)
    }

    async fn list_pvcs(&self, scope: &Scope) -> Result<Vec<PersistentVolumeClaim>, Error> {
        let api: Api<PersistentVolumeClaim> = self.scoped(scope);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(Error::list("PVCs"))?;
        debug!(scope = %scope, count = list.items.len(), "Listed PVCs");
        Ok(list.items)
    }

    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ServiceAccount>, Error> {
        let api: Api<ServiceAccount> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_pvc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<PersistentVolumeClaim>, Error> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }
}
