//! # 싱글톤 레지스트리
//!
//! `singleton_macro` 의 `#[service]` / `#[repository]` 매크로가 `inventory` 로
//! 제출하는 등록 정보를 모아 두고, 타입 이름으로 인스턴스를 찾아 주는 전역 로케이터입니다.
//!
//! ## 이름 규칙
//!
//! `ServiceLocator::get::<KycRepository>()` 는 타입 이름에서 `Repository` 접미사를 떼고
//! 소문자로 바꾼 `"kyc"` 를 키로 사용합니다. 따라서 매크로의 `name` 인자는
//! 접미사를 뗀 소문자 이름과 같아야 합니다.
//!
//! ```rust,ignore
//! #[repository(name = "kyc", collection = "kyc_submissions")]
//! pub struct KycRepository { db: Arc<Database>, redis: Arc<RedisClient> }
//!
//! #[service(name = "invitation")]
//! pub struct InvitationService { user_repo: Arc<UserRepository> }
//! ```
//!
//! 매크로가 만들 수 없는 인프라 객체(`Database`, `RedisClient`)는 부팅 시
//! [`ServiceLocator::set`] 으로 직접 등록합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// `#[service]` 매크로가 구현하는 trait
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[repository]` 매크로가 구현하는 trait
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

type Constructor = fn() -> Box<dyn Any + Send + Sync>;

static SERVICE_NAME_CACHE: Lazy<HashMap<String, (&'static str, Constructor)>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|r| (strip_registration_suffix(r.name), (r.name, r.constructor)))
        .collect();
    print_cache_initialized("Service", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, (&'static str, Constructor)>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|r| (strip_registration_suffix(r.name), (r.name, r.constructor)))
        .collect();
    print_cache_initialized("Repository", cache.len());
    cache
});

/// `"user_service"` 처럼 접미사가 붙은 등록 이름도 `"user"` 로 맞춥니다.
fn strip_registration_suffix(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `"crate::services::auth::TokenService"` → (`Service`, `"token"`)
fn lookup_key(type_name: &str) -> Option<(Kind, String)> {
    let short = type_name.rsplit("::").next().unwrap_or(type_name);

    if let Some(entity) = short.strip_suffix("Repository") {
        return Some((Kind::Repository, entity.to_lowercase()));
    }
    if let Some(entity) = short.strip_suffix("Service") {
        return Some((Kind::Service, entity.to_lowercase()));
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Service,
    Repository,
}

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
    initializing: RwLock::new(HashSet::new()),
});

impl ServiceLocator {
    fn instances() -> RwLockReadGuard<'static, HashMap<TypeId, Arc<dyn Any + Send + Sync>>> {
        LOCATOR.instances.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn instances_mut() -> RwLockWriteGuard<'static, HashMap<TypeId, Arc<dyn Any + Send + Sync>>> {
        LOCATOR.instances.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn initializing_mut() -> RwLockWriteGuard<'static, HashSet<TypeId>> {
        LOCATOR.initializing.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 타입에 해당하는 싱글톤을 반환합니다.
    ///
    /// 등록되지 않은 타입, 순환 의존성, 타입 불일치는 부팅 단계의 프로그래밍 오류이므로
    /// 패닉으로 즉시 드러냅니다. 생성자는 락 밖에서 호출되므로 의존성이
    /// 재귀적으로 `get` 을 호출해도 교착되지 않습니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(found) = Self::lookup::<T>(type_id) {
            return found;
        }

        if !Self::initializing_mut().insert(type_id) {
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }

        let created = Self::construct::<T>(type_name);
        Self::initializing_mut().remove(&type_id);

        // 동시에 생성된 경우 먼저 저장된 인스턴스를 우선합니다.
        let mut instances = Self::instances_mut();
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| created as Arc<dyn Any + Send + Sync>)
            .clone();
        drop(instances);

        stored
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("Type mismatch in ServiceLocator for {}", type_name))
    }

    fn lookup<T: 'static + Send + Sync>(type_id: TypeId) -> Option<Arc<T>> {
        Self::instances()
            .get(&type_id)
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let Some((kind, entity)) = lookup_key(type_name) else {
            panic!(
                "Service not found: {}. Register it with #[service]/#[repository] or ServiceLocator::set()",
                type_name
            );
        };

        let cache = match kind {
            Kind::Repository => &*REPOSITORY_NAME_CACHE,
            Kind::Service => &*SERVICE_NAME_CACHE,
        };

        let Some((registered_name, constructor)) = cache.get(&entity) else {
            panic!("No {:?} registered under '{}' (requested by {})", kind, entity, type_name);
        };

        match constructor().downcast::<Arc<T>>() {
            Ok(instance) => (*instance).clone(),
            Err(_) => panic!("Type mismatch for registration: {}", registered_name),
        }
    }

    /// 인프라 객체를 직접 등록합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", type_name.rsplit("::").next().unwrap_or(type_name));

        Self::instances_mut().insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리, 서비스를 미리 생성합니다.
    ///
    /// 리포지토리를 먼저 만들어 서비스 생성자가 항상 준비된 저장소를 받도록 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repositories: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        if !repositories.is_empty() {
            print_step_start(1, "Creating Repository instances");
            for registration in &repositories {
                let _ = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(1, "Repository instances created", repositories.len());
        }

        let services: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        if !services.is_empty() {
            print_step_start(2, "Creating Service instances");
            for registration in &services {
                let _ = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(2, "Service instances created", services.len());
        }

        print_final_summary(repositories.len(), services.len());
        Ok(())
    }
}
