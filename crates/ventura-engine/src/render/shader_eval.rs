//! Test-only interpreter for the straight-line WGSL in `shaders/`.
//!
//! Parses a shader with naga and evaluates one entry point invocation over the IR, so stage
//! tests can compare the real shader bodies against `render::stages`. Only the IR subset the
//! two shaders use is supported; anything else panics with the offending node.

use std::collections::HashMap;

use glam::{Mat4, Vec4};
use naga::{
    BinaryOperator, Binding, BuiltIn, Expression, Function, GlobalVariable, Handle,
    Literal, LocalVariable, Module, ShaderStage, Statement, Type, TypeInner, VectorSize,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Scalar(f32),
    Uint(u32),
    Vector(Vec<f32>),
    /// Column-major.
    Matrix(Vec<Vec<f32>>),
    Composite(Vec<Value>),
    Pointer(Place),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Root {
    Global(Handle<GlobalVariable>),
    Local(Handle<LocalVariable>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Place {
    root: Root,
    path: Vec<usize>,
}

impl Value {
    pub(crate) fn mat4(m: Mat4) -> Self {
        Value::Matrix(m.to_cols_array_2d().iter().map(|c| c.to_vec()).collect())
    }

    pub(crate) fn vec(components: &[f32]) -> Self {
        Value::Vector(components.to_vec())
    }

    pub(crate) fn as_vec4(&self) -> Vec4 {
        match self {
            Value::Vector(v) if v.len() == 4 => Vec4::new(v[0], v[1], v[2], v[3]),
            other => panic!("expected vec4, got {other:?}"),
        }
    }

    pub(crate) fn as_components(&self) -> Vec<f32> {
        match self {
            Value::Vector(v) => v.clone(),
            Value::Scalar(s) => vec![*s],
            other => panic!("expected vector, got {other:?}"),
        }
    }

    fn child(&self, index: usize) -> Value {
        match self {
            Value::Vector(v) => Value::Scalar(v[index]),
            Value::Matrix(cols) => Value::Vector(cols[index].clone()),
            Value::Composite(fields) => fields[index].clone(),
            other => panic!("cannot index {other:?}"),
        }
    }

    fn child_mut(&mut self, index: usize) -> &mut Value {
        match self {
            Value::Composite(fields) => &mut fields[index],
            other => panic!("cannot write through {other:?}"),
        }
    }

    fn flatten_into(self, out: &mut Vec<f32>) {
        match self {
            Value::Scalar(s) => out.push(s),
            Value::Uint(u) => out.push(u as f32),
            Value::Vector(v) => out.extend(v),
            other => panic!("cannot compose a vector from {other:?}"),
        }
    }
}

fn vector_len(size: VectorSize) -> usize {
    match size {
        VectorSize::Bi => 2,
        VectorSize::Tri => 3,
        VectorSize::Quad => 4,
    }
}

/// A parsed shader plus bound resource values.
pub(crate) struct ShaderEval {
    module: Module,
    globals: HashMap<Handle<GlobalVariable>, Value>,
}

/// Entry point outputs keyed by how they leave the stage.
#[derive(Debug, Default)]
pub(crate) struct StageOutput {
    pub position: Option<Value>,
    pub locations: HashMap<u32, Value>,
}

struct Frame<'f> {
    function: &'f Function,
    args: Vec<Value>,
    locals: HashMap<Handle<LocalVariable>, Value>,
}

impl ShaderEval {
    pub(crate) fn new(source: &str) -> Self {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|err| panic!("WGSL parse failed: {err}"));
        Self { module, globals: HashMap::new() }
    }

    /// Binds `value` to the global declared at `@group(group) @binding(binding)`.
    pub(crate) fn bind(&mut self, group: u32, binding: u32, value: Value) -> &mut Self {
        let handle = self
            .module
            .global_variables
            .iter()
            .find(|(_, var)| {
                var.binding.as_ref().is_some_and(|rb| rb.group == group && rb.binding == binding)
            })
            .map(|(h, _)| h)
            .unwrap_or_else(|| panic!("no global at group {group} binding {binding}"));
        self.globals.insert(handle, value);
        self
    }

    /// Runs entry point `name` with its arguments in declaration order.
    ///
    /// Struct arguments are passed as `Value::Composite` in member order.
    pub(crate) fn run(&self, name: &str, stage: ShaderStage, args: Vec<Value>) -> StageOutput {
        let ep = self
            .module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
            .unwrap_or_else(|| panic!("no {stage:?} entry point {name}"));

        let mut frame = Frame { function: &ep.function, args, locals: HashMap::new() };
        for (handle, local) in ep.function.local_variables.iter() {
            let value = match local.init {
                Some(init) => self.eval(&mut frame, init),
                None => self.zero(local.ty),
            };
            frame.locals.insert(handle, value);
        }

        let returned = self
            .exec(&mut frame, &ep.function.body)
            .unwrap_or_else(|| panic!("{name} returned nothing"));

        let result = ep
            .function
            .result
            .as_ref()
            .unwrap_or_else(|| panic!("{name} has no result type"));

        let mut out = StageOutput::default();
        match (&result.binding, &self.module.types[result.ty].inner) {
            (Some(binding), _) => out.record(binding, returned),
            (None, TypeInner::Struct { members, .. }) => {
                let Value::Composite(fields) = returned else {
                    panic!("{name} returned a non-struct value");
                };
                for (member, value) in members.iter().zip(fields) {
                    if let Some(binding) = &member.binding {
                        out.record(binding, value);
                    }
                }
            }
            (None, other) => panic!("unbound result type {other:?}"),
        }
        out
    }

    fn exec(&self, frame: &mut Frame<'_>, block: &naga::Block) -> Option<Value> {
        for stmt in block.iter() {
            match stmt {
                Statement::Emit(_) => {}
                Statement::Block(inner) => {
                    if let Some(v) = self.exec(frame, inner) {
                        return Some(v);
                    }
                }
                Statement::Store { pointer, value } => {
                    let Value::Pointer(place) = self.eval(frame, *pointer) else {
                        panic!("store through a non-pointer");
                    };
                    let value = self.eval(frame, *value);
                    self.write(frame, &place, value);
                }
                Statement::Return { value } => {
                    return value.map(|v| self.eval(frame, v));
                }
                other => panic!("unsupported statement {other:?}"),
            }
        }
        None
    }

    fn eval(&self, frame: &mut Frame<'_>, handle: Handle<Expression>) -> Value {
        let function = frame.function;
        match &function.expressions[handle] {
            Expression::FunctionArgument(i) => frame.args[*i as usize].clone(),
            Expression::GlobalVariable(h) => {
                Value::Pointer(Place { root: Root::Global(*h), path: vec![] })
            }
            Expression::LocalVariable(h) => {
                Value::Pointer(Place { root: Root::Local(*h), path: vec![] })
            }
            Expression::Load { pointer } => {
                let Value::Pointer(place) = self.eval(frame, *pointer) else {
                    panic!("load from a non-pointer");
                };
                self.read(frame, &place)
            }
            Expression::AccessIndex { base, index } => {
                self.index(self.eval(frame, *base), *index as usize)
            }
            Expression::Access { base, index } => {
                let index = match self.eval(frame, *index) {
                    Value::Uint(u) => u as usize,
                    other => panic!("dynamic index must be an integer, got {other:?}"),
                };
                self.index(self.eval(frame, *base), index)
            }
            other => {
                let other = other.clone();
                self.eval_value(&other, &mut |h| self.eval(frame, h))
            }
        }
    }

    /// Expressions that never touch variables; shared with constant initializers.
    fn eval_value(
        &self,
        expr: &Expression,
        sub: &mut dyn FnMut(Handle<Expression>) -> Value,
    ) -> Value {
        match expr {
            Expression::Literal(lit) => match *lit {
                Literal::F32(v) => Value::Scalar(v),
                Literal::AbstractFloat(v) => Value::Scalar(v as f32),
                Literal::U32(v) => Value::Uint(v),
                Literal::I32(v) => Value::Uint(v as u32),
                Literal::AbstractInt(v) => Value::Uint(v as u32),
                other => panic!("unsupported literal {other:?}"),
            },
            Expression::Constant(h) => self.eval_global(self.module.constants[*h].init),
            Expression::ZeroValue(ty) => self.zero(*ty),
            Expression::Splat { size, value } => {
                let Value::Scalar(s) = sub(*value) else { panic!("splat of a non-scalar") };
                Value::Vector(vec![s; vector_len(*size)])
            }
            Expression::Compose { ty, components } => {
                let values: Vec<Value> = components.iter().map(|c| sub(*c)).collect();
                match &self.module.types[*ty].inner {
                    TypeInner::Vector { .. } => {
                        let mut out = Vec::new();
                        for v in values {
                            v.flatten_into(&mut out);
                        }
                        Value::Vector(out)
                    }
                    TypeInner::Matrix { .. } => Value::Matrix(
                        values.into_iter().map(|v| v.as_components()).collect(),
                    ),
                    _ => Value::Composite(values),
                }
            }
            Expression::Binary { op: BinaryOperator::Multiply, left, right } => {
                multiply(sub(*left), sub(*right))
            }
            other => panic!("unsupported expression {other:?}"),
        }
    }

    fn eval_global(&self, handle: Handle<Expression>) -> Value {
        let expr = self.module.global_expressions[handle].clone();
        self.eval_value(&expr, &mut |h| self.eval_global(h))
    }

    fn index(&self, base: Value, index: usize) -> Value {
        match base {
            Value::Pointer(mut place) => {
                place.path.push(index);
                Value::Pointer(place)
            }
            value => value.child(index),
        }
    }

    fn read(&self, frame: &Frame<'_>, place: &Place) -> Value {
        let mut value = match &place.root {
            Root::Global(h) => self
                .globals
                .get(h)
                .unwrap_or_else(|| {
                    panic!("global {:?} is not bound", self.module.global_variables[*h].name)
                })
                .clone(),
            Root::Local(h) => frame.locals[h].clone(),
        };
        for &i in &place.path {
            value = value.child(i);
        }
        value
    }

    fn write(&self, frame: &mut Frame<'_>, place: &Place, value: Value) {
        let Root::Local(h) = &place.root else { panic!("write to a global") };
        let mut target = frame
            .locals
            .get_mut(h)
            .unwrap_or_else(|| panic!("unknown local"));
        for &i in &place.path {
            target = target.child_mut(i);
        }
        *target = value;
    }

    fn zero(&self, ty: Handle<Type>) -> Value {
        match &self.module.types[ty].inner {
            TypeInner::Scalar(_) => Value::Scalar(0.0),
            TypeInner::Vector { size, .. } => Value::Vector(vec![0.0; vector_len(*size)]),
            TypeInner::Matrix { columns, rows, .. } => {
                Value::Matrix(vec![vec![0.0; vector_len(*rows)]; vector_len(*columns)])
            }
            TypeInner::Struct { members, .. } => {
                Value::Composite(members.iter().map(|m| self.zero(m.ty)).collect())
            }
            other => panic!("cannot zero {other:?}"),
        }
    }
}

impl StageOutput {
    fn record(&mut self, binding: &Binding, value: Value) {
        match binding {
            Binding::BuiltIn(BuiltIn::Position { .. }) => self.position = Some(value),
            Binding::Location { location, .. } => {
                self.locations.insert(*location, value);
            }
            other => panic!("unsupported output binding {other:?}"),
        }
    }

    pub(crate) fn clip_position(&self) -> Vec4 {
        self.position.as_ref().map(Value::as_vec4).unwrap_or_else(|| panic!("no position output"))
    }

    pub(crate) fn location(&self, location: u32) -> &Value {
        self.locations
            .get(&location)
            .unwrap_or_else(|| panic!("no output at location {location}"))
    }
}

fn multiply(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a * b),
        (Value::Vector(v), Value::Scalar(s)) | (Value::Scalar(s), Value::Vector(v)) => {
            Value::Vector(v.into_iter().map(|x| x * s).collect())
        }
        (Value::Matrix(m), Value::Vector(v)) => Value::Vector(mat_vec(&m, &v)),
        (Value::Matrix(a), Value::Matrix(b)) => {
            Value::Matrix(b.iter().map(|col| mat_vec(&a, col)).collect())
        }
        (l, r) => panic!("unsupported multiply {l:?} * {r:?}"),
    }
}

fn mat_vec(m: &[Vec<f32>], v: &[f32]) -> Vec<f32> {
    let rows = m.first().map_or(0, Vec::len);
    (0..rows)
        .map(|r| m.iter().zip(v).map(|(col, x)| col[r] * x).sum())
        .collect()
}
