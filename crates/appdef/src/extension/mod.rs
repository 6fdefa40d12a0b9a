//! Extensions: commands, queries, projectors and jobs.
//!
//! The engine only records what an extension is (engine kind, entry name, parameters, the
//! storages it reads and writes, its triggers or schedule). Executing extensions and parsing
//! cron expressions belong to other components.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{
	Error, ExtensionEngineKind, Filter, OperationKind, OperationSet, QName, QNames, Type, TypeKindSet,
	TypeRef, Types, filter_matches,
};


/// Name of the built-in record storage.
pub fn sys_records_storage() -> QName {
	QName::sys("records")
}

/// Name of the built-in view storage.
pub fn sys_views_storage() -> QName {
	QName::sys("views")
}

/// Name of the built-in event log storage.
pub fn sys_wlog_storage() -> QName {
	QName::sys("WLog")
}

/// Header shared by every extension kind.
#[derive(Debug, Clone)]
pub struct Extension {
	name: String,
	engine: ExtensionEngineKind,
}

impl Extension {
	pub(crate) fn new(name: &QName) -> Self {
		Self {
			name: name.entity().to_owned(),
			engine: ExtensionEngineKind::BuiltIn,
		}
	}

	/// Entry point name inside the engine. Defaults to the type entity.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn engine(&self) -> ExtensionEngineKind {
		self.engine
	}

	pub(crate) fn set_name(&mut self, name: &str) -> Result<(), Error> {
		crate::valid_ident(name).map_err(|e| Error::Invalid(format!("extension name «{name}»: {e}")))?;
		self.name = name.to_owned();
		Ok(())
	}

	pub(crate) fn set_engine(&mut self, engine: ExtensionEngineKind) {
		self.engine = engine;
	}
}

/// One storage an extension reads or writes, with the types it touches there.
#[derive(Debug, Clone, PartialEq)]
pub struct Storage {
	name: QName,
	names: QNames,
	comment: Option<String>,
}

impl Storage {
	pub fn name(&self) -> &QName {
		&self.name
	}

	/// Types touched in the storage, sorted.
	pub fn names(&self) -> &QNames {
		&self.names
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}
}

impl fmt::Display for Storage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Storage «{}» [{}]", self.name, self.names)
	}
}

/// States or intents of a projector or job, keyed and sorted by storage name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storages {
	map: BTreeMap<QName, Storage>,
}

impl Storages {
	/// Adds `names` to `storage`, creating it on first use. Repeated adds concatenate.
	pub(crate) fn add(&mut self, storage: &QName, names: &[QName]) -> Result<(), Error> {
		if storage.is_null() {
			return Err(Error::Missed("storage name".into()));
		}
		crate::valid_qname(storage)?;
		for n in names {
			crate::valid_qname(n)?;
		}
		let entry = self.map.entry(storage.clone()).or_insert_with(|| Storage {
			name: storage.clone(),
			names: QNames::new(),
			comment: None,
		});
		for n in names {
			entry.names.add(n.clone());
		}
		Ok(())
	}

	pub(crate) fn set_comment(&mut self, storage: &QName, comment: &str) -> Result<(), Error> {
		let s = self
			.map
			.get_mut(storage)
			.ok_or_else(|| Error::NotFound(format!("storage «{storage}»")))?;
		s.comment = Some(comment.to_owned());
		Ok(())
	}

	pub fn storage(&self, name: &QName) -> Option<&Storage> {
		self.map.get(name)
	}

	/// Storage names, sorted.
	pub fn names(&self) -> impl Iterator<Item = &QName> {
		self.map.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Storage> {
		self.map.values()
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub(crate) fn validate(&self, owner: &Type, types: &Types, errors: &mut Vec<Error>) {
		for s in self.iter() {
			if types.get(&s.name).is_none() {
				errors.push(Error::NotFound(format!("{owner} storage «{}»", s.name)));
			}
			for n in &s.names {
				if types.get(n).is_none() {
					errors.push(Error::NotFound(format!("{owner} {} name «{n}»", s)));
				}
			}
		}
	}
}

/// Payload of commands and queries.
#[derive(Debug, Clone)]
pub struct Function {
	pub(crate) ext: Extension,
	pub(crate) param: Option<TypeRef>,
	pub(crate) unlogged_param: Option<TypeRef>,
	pub(crate) result: Option<TypeRef>,
}

/// Kinds a function parameter may name.
const PARAM_KINDS: TypeKindSet = TypeKindSet::ANY
	.union(TypeKindSet::DATA)
	.union(TypeKindSet::ODOC)
	.union(TypeKindSet::OBJECT);

/// Kinds a function result may name.
const RESULT_KINDS: TypeKindSet = PARAM_KINDS
	.union(TypeKindSet::GDOC)
	.union(TypeKindSet::CDOC)
	.union(TypeKindSet::WDOC);

impl Function {
	pub(crate) fn new(name: &QName) -> Self {
		Self {
			ext: Extension::new(name),
			param: None,
			unlogged_param: None,
			result: None,
		}
	}

	pub fn extension(&self) -> &Extension {
		&self.ext
	}

	pub fn param_name(&self) -> Option<&QName> {
		self.param.as_ref().map(TypeRef::name)
	}

	pub fn param<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.param.as_ref().and_then(|r| r.target(types))
	}

	pub fn unlogged_param_name(&self) -> Option<&QName> {
		self.unlogged_param.as_ref().map(TypeRef::name)
	}

	pub fn unlogged_param<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.unlogged_param.as_ref().and_then(|r| r.target(types))
	}

	pub fn result_name(&self) -> Option<&QName> {
		self.result.as_ref().map(TypeRef::name)
	}

	pub fn result<'a>(&self, types: &'a Types) -> Option<&'a Type> {
		self.result.as_ref().and_then(|r| r.target(types))
	}

	pub(crate) fn validate(&self, owner: &Type, types: &Types, errors: &mut Vec<Error>) {
		let slots = [
			("parameter", &self.param, PARAM_KINDS),
			("unlogged parameter", &self.unlogged_param, PARAM_KINDS),
			("result", &self.result, RESULT_KINDS),
		];
		for (what, slot, kinds) in slots {
			let Some(r) = slot else { continue };
			match r.target(types) {
				None => errors.push(Error::NotFound(format!("{owner} {what} «{}»", r.name()))),
				Some(t) if !kinds.has(t.kind()) => {
					errors.push(Error::Incompatible(format!("{owner} {what} {t}")));
				}
				Some(_) => {}
			}
		}
	}
}

/// Optional parser for job schedules, wired in by the host.
pub type CronValidator = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// A projector trigger: operations on the types a filter matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectorEvent {
	ops: OperationSet,
	filter: Filter,
	comment: Option<String>,
}

impl ProjectorEvent {
	/// Operations, in declaration order of [`OperationKind`].
	pub fn ops(&self) -> Vec<OperationKind> {
		self.ops.to_vec()
	}

	pub fn op(&self, op: OperationKind) -> bool {
		self.ops.has(op)
	}

	pub fn filter(&self) -> &Filter {
		&self.filter
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}
}

impl fmt::Display for ProjectorEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ON {} IF {}", self.ops, self.filter)
	}
}

const EVENT_OPS: OperationSet = OperationSet::RECORDS
	.union(OperationSet::EXECUTE)
	.union(OperationSet::EXECUTE_WITH_PARAM);

/// Payload of projectors.
#[derive(Debug, Clone)]
pub struct Projector {
	pub(crate) ext: Extension,
	pub(crate) events: Vec<ProjectorEvent>,
	pub(crate) sync: bool,
	pub(crate) want_errors: bool,
	pub(crate) states: Storages,
	pub(crate) intents: Storages,
}

impl Projector {
	pub(crate) fn new(name: &QName) -> Self {
		Self {
			ext: Extension::new(name),
			events: Vec::new(),
			sync: false,
			want_errors: false,
			states: Storages::default(),
			intents: Storages::default(),
		}
	}

	pub fn extension(&self) -> &Extension {
		&self.ext
	}

	/// Events, in declaration order.
	pub fn events(&self) -> &[ProjectorEvent] {
		&self.events
	}

	pub fn sync(&self) -> bool {
		self.sync
	}

	/// Returns true if the projector also receives events that failed.
	pub fn want_errors(&self) -> bool {
		self.want_errors
	}

	pub fn states(&self) -> &Storages {
		&self.states
	}

	pub fn intents(&self) -> &Storages {
		&self.intents
	}

	pub(crate) fn add_event(&mut self, ops: &[OperationKind], filter: Filter, comment: &str) -> Result<(), Error> {
		if ops.is_empty() {
			return Err(Error::Missed("projector event operations".into()));
		}
		let set: OperationSet = ops.iter().collect();
		if set.has(OperationKind::Inherits) || set.has(OperationKind::Null) {
			return Err(Error::Unsupported(format!("projector event operations {set}")));
		}
		if !EVENT_OPS.contains(set) {
			return Err(Error::Incompatible(format!("projector event operations {set}")));
		}
		self.events.push(ProjectorEvent {
			ops: set,
			filter,
			comment: (!comment.is_empty()).then(|| comment.to_owned()),
		});
		Ok(())
	}

	/// Returns true if operation `op` on `t` fires this projector.
	///
	/// For [`OperationKind::ExecuteWithParam`] the event filters are matched against the
	/// parameter of the command `t`.
	pub fn triggers(&self, op: OperationKind, t: &Type, types: &Types) -> bool {
		let target = match op {
			OperationKind::ExecuteWithParam => match t.as_function().and_then(|f| f.param(types)) {
				Some(param) => param,
				None => return false,
			},
			_ => t,
		};
		self.events
			.iter()
			.any(|e| e.ops.has(op) && e.filter.matches(target, types))
	}

	pub(crate) fn validate(&self, owner: &Type, types: &Types, errors: &mut Vec<Error>) {
		if self.events.is_empty() {
			errors.push(Error::Missed(format!("{owner} events")));
		}
		for e in &self.events {
			let visible = crate::workspace::visible_types(types, owner.workspace());
			if filter_matches(&e.filter, visible, types).is_empty() {
				errors.push(Error::filter_has_no_matches(&e.filter, owner.workspace()));
			}
		}
		self.states.validate(owner, types, errors);
		self.intents.validate(owner, types, errors);
	}
}

/// Payload of scheduled jobs.
#[derive(Debug, Clone)]
pub struct Job {
	pub(crate) ext: Extension,
	pub(crate) cron: String,
	pub(crate) states: Storages,
	pub(crate) intents: Storages,
}

impl Job {
	pub(crate) fn new(name: &QName) -> Self {
		Self {
			ext: Extension::new(name),
			cron: String::new(),
			states: Storages::default(),
			intents: Storages::default(),
		}
	}

	pub fn extension(&self) -> &Extension {
		&self.ext
	}

	/// Raw schedule expression.
	pub fn cron(&self) -> &str {
		&self.cron
	}

	pub fn states(&self) -> &Storages {
		&self.states
	}

	pub fn intents(&self) -> &Storages {
		&self.intents
	}

	pub(crate) fn validate(
		&self,
		owner: &Type,
		types: &Types,
		cron: Option<&CronValidator>,
		errors: &mut Vec<Error>,
	) {
		if self.cron.is_empty() {
			errors.push(Error::Missed(format!("{owner} cron schedule")));
		} else if let Some(parse) = cron
			&& let Err(msg) = parse(&self.cron)
		{
			errors.push(Error::Invalid(format!("{owner} cron «{}»: {msg}", self.cron)));
		}
		self.states.validate(owner, types, errors);
		self.intents.validate(owner, types, errors);
	}
}
