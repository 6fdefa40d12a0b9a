use super::AppDefBuilder;
use crate::acl::validate_role_cycles;
use crate::structure::{validate_containers, validate_fields, validate_uniques};
use crate::workspace::validate_workspace;
use crate::{AppDef, BuildError, Error, Type, TypeBody, TypeKind, TypeKindSet};

/// Validates every type and rule of `app` and seals it if nothing is wrong.
pub(super) fn build(app: AppDefBuilder) -> Result<AppDef, BuildError> {
	let span = tracing::debug_span!("appdef.build");
	let _guard = span.enter();

	let workspaces = app.types.of_kinds(TypeKindSet::WORKSPACE).count();
	tracing::debug!(types = app.types.len(), workspaces, "appdef build started");

	let errors = validate(&app);
	if !errors.is_empty() {
		for err in &errors {
			tracing::trace!(error = %err, "validation error");
		}
		tracing::warn!(errors = errors.len(), "appdef build failed");
		return Err(BuildError::new(errors));
	}

	check_contracts(&app);
	tracing::debug!(types = app.types.len(), acl_rules = app.acl.len(), "appdef sealed");
	Ok(AppDef::seal(app))
}

/// Runs every whole-graph check. Never stops at the first error.
fn validate(app: &AppDefBuilder) -> Vec<Error> {
	let types = &app.types;
	let mut errors = Vec::new();

	for t in types.iter() {
		validate_type(app, t, &mut errors);
	}
	for rule in &app.acl {
		rule.validate(types, &mut errors);
	}
	validate_role_cycles(types, &app.acl, &mut errors);
	errors
}

fn validate_type(app: &AppDefBuilder, t: &Type, errors: &mut Vec<Error>) {
	let types = &app.types;
	match t.body() {
		TypeBody::Structure(s) => {
			validate_fields(t, s.fields(), types, errors);
			validate_containers(t, s.containers(), types, errors);
			validate_uniques(t, s, errors);
		}
		TypeBody::View(v) => {
			v.validate(t, errors);
			validate_fields(t, v.fields(), types, errors);
		}
		TypeBody::Function(f) => f.validate(t, types, errors),
		TypeBody::Projector(p) => p.validate(t, types, errors),
		TypeBody::Job(j) => j.validate(t, types, app.cron.as_ref(), errors),
		TypeBody::Workspace(ws) => validate_workspace(t, ws, types, errors),
		TypeBody::Limit(l) => l.validate(t, types, errors),
		TypeBody::Data(_) | TypeBody::Rate(_) | TypeBody::Tag(_) | TypeBody::Empty => {}
	}
}

/// Registry-level assumptions the sealed application relies on.
fn check_contracts(app: &AppDefBuilder) {
	if cfg!(any(debug_assertions, feature = "contracts")) {
		assert!(app.types.is_consistent(), "type registry order is inconsistent");
		for t in app.types.iter() {
			assert!(
				app.types
					.get(t.workspace())
					.is_some_and(|ws| ws.kind() == TypeKind::Workspace),
				"{t} is owned by unknown workspace «{}»",
				t.workspace()
			);
		}
	}
}
