//! Builds extension resources for the collections of a service plugin.
use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;

use crate::extension::attributes::AttributeMap;
use crate::extension::records::ResourceExtension;
use crate::kernel::constants;
use crate::service::ResourceContext;
use crate::service::controller::ServiceResourceController;
use crate::service::error::ServiceError;

/// Options of [`build_resource_info`]
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Singular resource name → member action → method
    pub action_map: BTreeMap<String, BTreeMap<String, Method>>,
    /// Expose `a_b` collections as `a-b`
    pub translate_name: bool,
    pub allow_bulk: bool,
}

/// Plural → singular name of every collection in `resource_map`.
///
/// `special_mappings` wins (`policies` → `policy`); otherwise the last
/// character is dropped (`routers` → `router`).
pub fn build_plural_mappings(
    special_mappings: &BTreeMap<String, String>,
    resource_map: &AttributeMap,
) -> BTreeMap<String, String> {
    resource_map
        .resource_names()
        .map(|plural| {
            let singular = special_mappings.get(plural).cloned().unwrap_or_else(|| {
                let mut singular = plural.to_string();
                singular.pop();
                singular
            });
            (plural.to_string(), singular)
        })
        .collect()
}

/// One [`ResourceExtension`] per collection of `resource_map`, served by the
/// plugin registered as `which_service` (`None` or empty for the core plugin).
pub fn build_resource_info(
    plural_mappings: &BTreeMap<String, String>,
    resource_map: &AttributeMap,
    which_service: Option<&str>,
    options: &ResourceOptions,
    ctx: &ResourceContext,
) -> Result<Vec<ResourceExtension>, ServiceError> {
    let which_service = which_service
        .filter(|service| !service.is_empty())
        .unwrap_or(constants::CORE);
    let plugin = ctx.services.get(which_service)?;
    let path_prefix = constants::common_prefix(which_service)
        .ok_or_else(|| ServiceError::UnknownPrefix(which_service.to_string()))?;

    let mut resources = Vec::new();
    for (collection_name, params) in resource_map.iter() {
        let resource_name = plural_mappings
            .get(collection_name)
            .ok_or_else(|| ServiceError::MissingPluralMapping(collection_name.clone()))?;
        let collection = if options.translate_name {
            collection_name.replace('_', "-")
        } else {
            collection_name.clone()
        };
        let member_actions = options
            .action_map
            .get(resource_name)
            .cloned()
            .unwrap_or_default();

        let controller = ServiceResourceController::new(
            collection.clone(),
            resource_name.clone(),
            Arc::clone(&plugin),
            params.clone(),
        )
        .with_member_actions(member_actions.clone())
        .with_bulk(options.allow_bulk)
        .with_pagination(ctx.config.allow_pagination, ctx.config.pagination_max_limit)
        .with_sorting(ctx.config.allow_sorting);

        log::debug!(
            "Built resource {} ({}) for service {}",
            collection,
            resource_name,
            which_service
        );
        resources.push(
            ResourceExtension::new(collection, Arc::new(controller))
                .with_path_prefix(path_prefix)
                .with_member_actions(member_actions)
                .with_attr_map(params.clone()),
        );
    }
    Ok(resources)
}
