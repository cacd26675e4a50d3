use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_locate::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_direct_hit(c: &mut Criterion) {
    let db = TypeDescriptor::interface("app::Db");
    let mut registrations = RegistrationCollection::new();
    registrations.add_export(db.clone());
    let scope = registrations.build();

    c.bench_function("can_locate_direct", |b| {
        b.iter(|| black_box(scope.can_locate(black_box(&db), None, None).unwrap()))
    });
}

fn bench_branches(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_locate_branch");

    let db = TypeDescriptor::interface("app::Db");
    let mut registrations = RegistrationCollection::new();
    registrations
        .add_export(db.clone())
        .add_keyed_export(TypeDescriptor::primitive("u16"), "port")
        .add_standard_wrappers();
    let scope = registrations.build();

    let cases = [
        ("keyed", TypeDescriptor::primitive("u16"), Some(LocateKey::from("port"))),
        ("array", TypeDescriptor::array(db.clone()), None),
        ("wrapper", well_known::lazy().make_generic([db.clone()]).unwrap(), None),
        ("collection", well_known::vec().make_generic([db.clone()]).unwrap(), None),
        ("auto_register", TypeDescriptor::class("app::Handler"), None),
        ("framework", well_known::locator_service(), None),
        ("miss", TypeDescriptor::interface("app::Missing"), None),
    ];

    for (name, ty, key) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), ty, |b, ty| {
            b.iter(|| black_box(scope.can_locate(ty, None, key.as_ref()).unwrap()))
        });
    }

    group.finish();
}

fn bench_nested_unwrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_unwrap");

    let db = TypeDescriptor::interface("app::Db");
    let mut registrations = RegistrationCollection::new();
    registrations.add_export(db.clone()).add_standard_wrappers();
    let scope = registrations.build();

    for &depth in &[1usize, 4, 16] {
        let mut ty = db.clone();
        for level in 0..depth {
            let wrapper = if level % 2 == 0 { well_known::lazy() } else { well_known::factory() };
            ty = wrapper.make_generic([ty]).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("depth", depth), &ty, |b, ty| {
            b.iter(|| black_box(scope.can_locate(ty, None, None).unwrap()))
        });
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_scope_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_depth");

    let db = TypeDescriptor::interface("app::Db");

    for &depth in &[1usize, 8, 32] {
        let mut root_registrations = RegistrationCollection::new();
        root_registrations.add_export(db.clone());
        let mut scope = root_registrations.build();
        for _ in 0..depth {
            scope = scope.create_child_scope(RegistrationCollection::new());
        }

        group.bench_with_input(BenchmarkId::new("root_registration_from_leaf", depth), &scope, |b, scope| {
            b.iter(|| black_box(scope.can_locate(&db, None, None).unwrap()))
        });
    }

    group.finish();
}

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    for &count in &[10usize, 100, 1000] {
        let mut registrations = RegistrationCollection::new();
        for i in 0..count {
            registrations.add_export(TypeDescriptor::interface(format!("app::Service{}", i)));
        }
        let scope = registrations.build();
        let target = TypeDescriptor::interface(format!("app::Service{}", count / 2));

        group.bench_with_input(BenchmarkId::new("locate", count), &target, |b, target| {
            b.iter(|| black_box(scope.can_locate(target, None, None).unwrap()))
        });
    }

    group.finish();
}

struct LocatePlans;

impl ActivationExpressionBuilder for LocatePlans {
    fn get_activation_expression(
        &self,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
    ) -> DiResult<Option<ConstructionPlan>> {
        let ty = request.activation_type();
        Ok(scope
            .can_locate(ty, request.filter(), request.locate_key())?
            .then(|| ConstructionPlan::new(PlanNode::locate(ty.clone(), request.locate_key().cloned()))))
    }
}

fn bench_member_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("member_plan");

    let report = TypeDescriptor::class("app::Report");
    let clock = TypeDescriptor::interface("app::Clock");
    let mut registrations = RegistrationCollection::new();
    registrations.add_export(clock.clone());
    let scope = registrations.build();

    let services = Arc::new(ActivationServices::new(Arc::new(LocatePlans)));
    let request = Arc::new(ActivationExpressionRequest::root(report.clone(), scope.clone(), services));
    let creator = DefaultMemberInjectionExpressionCreator::new();

    for &members in &[1usize, 8, 32] {
        let selector = KnownMembersSelector::new((0..members).map(|i| {
            MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), format!("m{}", i), clock.clone()))
        }));
        let configuration = TypeActivationConfiguration::new(Arc::new(ActivationStrategy::new(report.clone())))
            .with_selector(Arc::new(selector));

        group.bench_with_input(BenchmarkId::new("create_expression", members), &configuration, |b, configuration| {
            b.iter(|| {
                let plan = ConstructionPlan::new(PlanNode::new_object(report.clone(), vec![]));
                black_box(creator.create_expression(&scope, &request, configuration, plan).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("get_dependencies", members), &configuration, |b, configuration| {
            b.iter(|| black_box(creator.get_dependencies(configuration, &request)))
        });
    }

    group.finish();
}

criterion_group!(micro_benches, bench_direct_hit, bench_branches, bench_nested_unwrap);

criterion_group!(macro_benches, bench_scope_depth, bench_large_registry, bench_member_plan);

criterion_main!(micro_benches, macro_benches);
