use crate::{CompiledQuery, Entity, PartsContainer};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

type CompileHook = Arc<dyn Fn(&mut PartsContainer) + Send + Sync>;
type ExecuteHook = Arc<dyn Fn(&CompiledQuery) + Send + Sync>;
type ExecutionOverride<T> = Arc<dyn Fn(&CompiledQuery) -> Vec<T> + Send + Sync>;

/// Per-type hooks into the query pipeline.
///
/// `before_compile` hooks may still mutate the parts container;
/// `before_execute` hooks observe the finished SQL; an `as_execute` hook
/// replaces the connection round trip entirely and produces the result items
/// itself. Hooks registered for one entity never fire for another.
#[derive(Default)]
pub struct Interceptors {
    before_compile: HashMap<&'static str, Vec<CompileHook>>,
    before_execute: HashMap<&'static str, Vec<ExecuteHook>>,
    as_execute: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_compile<E: Entity>(
        &mut self,
        hook: impl Fn(&mut PartsContainer) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_compile_named(E::table_name(), hook)
    }

    pub fn before_compile_named(
        &mut self,
        entity: &'static str,
        hook: impl Fn(&mut PartsContainer) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_compile
            .entry(entity)
            .or_default()
            .push(Arc::new(hook));
        self
    }

    pub fn before_execute<E: Entity>(
        &mut self,
        hook: impl Fn(&CompiledQuery) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_execute_named(E::table_name(), hook)
    }

    pub fn before_execute_named(
        &mut self,
        entity: &'static str,
        hook: impl Fn(&CompiledQuery) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_execute
            .entry(entity)
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Registers an execution replacement producing `T` items. At most one
    /// per item type; a second registration replaces the first.
    pub fn as_execute<T: 'static>(
        &mut self,
        hook: impl Fn(&CompiledQuery) -> Vec<T> + Send + Sync + 'static,
    ) -> &mut Self {
        let hook: ExecutionOverride<T> = Arc::new(hook);
        self.as_execute.insert(TypeId::of::<T>(), Box::new(hook));
        self
    }

    pub fn run_before_compile(&self, entity: &str, container: &mut PartsContainer) {
        if let Some(hooks) = self.before_compile.get(entity) {
            for hook in hooks {
                hook(container);
            }
        }
    }

    pub fn run_before_execute(&self, query: &CompiledQuery) {
        if let Some(hooks) = self.before_execute.get(query.entity.as_str()) {
            for hook in hooks {
                hook(query);
            }
        }
    }

    /// Runs the execution replacement for `T` when one is registered.
    pub fn execution_override<T: 'static>(&self, query: &CompiledQuery) -> Option<Vec<T>> {
        self.as_execute
            .get(&TypeId::of::<T>())
            .and_then(|hook| hook.downcast_ref::<ExecutionOverride<T>>())
            .map(|hook| hook(query))
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("before_compile", &self.before_compile.len())
            .field("before_execute", &self.before_execute.len())
            .field("as_execute", &self.as_execute.len())
            .finish()
    }
}
