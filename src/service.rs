//! Services and the documentation set built from all definitions.

use crate::definitions::{DefinitionSet, ServiceDef};
use crate::error::Result;
use crate::export::export_method;
use crate::markdown::to_kebab_case;
use crate::method::Method;
use crate::registry::TypeRegistry;
use crate::renderer::Renderer;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// An RPC service and its methods.
#[derive(Debug)]
pub struct Service {
    pub name: String,
    pub full_name: String,
    pub package: String,
    pub description: String,
    pub methods: Vec<Method>,
}

impl Service {
    pub fn new(def: &ServiceDef, package: &str, registry: &Rc<TypeRegistry>) -> Self {
        let methods = def
            .methods
            .iter()
            .map(|m| Method::new(m, &def.name, package, Rc::clone(registry)))
            .collect();

        Self {
            name: def.name.clone(),
            full_name: def.full_name.clone(),
            package: package.to_string(),
            description: def.description.clone(),
            methods,
        }
    }

    /// Directory name for this service's pages.
    pub fn dir_name(&self) -> String {
        to_kebab_case(&self.name)
    }

    /// Exports every method, one after the other, into
    /// `out_dir/<package>/<service>`.
    ///
    /// Methods are exported strictly in sequence: a method's REST mapping is
    /// applied and its page rendered before the next method starts, since
    /// methods may share request messages.
    pub fn export(&self, out_dir: &Path, renderer: &dyn Renderer) -> anyhow::Result<Vec<PathBuf>> {
        let service_dir = out_dir.join(&self.package).join(self.dir_name());
        info!(
            "Exporting service {} ({} methods) to {}",
            self.full_name,
            self.methods.len(),
            service_dir.display()
        );

        let mut written = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            written.push(export_method(method, &service_dir, renderer)?);
        }
        Ok(written)
    }
}

/// Outcome of a full export run.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub services: usize,
    pub files: Vec<PathBuf>,
}

/// All services of a definition set, sharing one type registry.
#[derive(Debug)]
pub struct ApiDocs {
    pub registry: Rc<TypeRegistry>,
    pub services: Vec<Service>,
}

impl ApiDocs {
    /// Builds the registry, then every service of every package.
    ///
    /// # Errors
    ///
    /// Fails if the definitions declare a type name twice.
    pub fn from_definitions(definitions: &DefinitionSet) -> Result<Self> {
        let registry = Rc::new(TypeRegistry::build(definitions)?);
        info!(
            "Registered {} messages and {} enums",
            registry.message_count(),
            registry.enum_count()
        );

        let services = definitions
            .packages
            .iter()
            .flat_map(|package| {
                package
                    .services
                    .iter()
                    .map(|s| Service::new(s, &package.name, &registry))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        debug!("Built {} services", services.len());

        Ok(Self { registry, services })
    }

    pub fn method_count(&self) -> usize {
        self.services.iter().map(|s| s.methods.len()).sum()
    }

    /// Exports every service in declaration order. The first failure stops
    /// the run and is returned as is.
    pub fn export(&self, out_dir: &Path, renderer: &dyn Renderer) -> anyhow::Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        for service in &self.services {
            summary.files.extend(service.export(out_dir, renderer)?);
            summary.services += 1;
        }
        Ok(summary)
    }
}
