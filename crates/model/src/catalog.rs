//! Entity catalog
//!
//! Declarative schemas for every entity the dashboard manages, plus the
//! sidebar menu that groups them.

use crate::column::{CellFormat, ColumnDef};
use crate::entity::{EntitySchema, FormRule, ReferenceSource};
use crate::field::{FieldSchema, SelectOption};
use condo_core::{AdminError, AdminResult, Breakpoint, Validatable};
use std::sync::LazyLock;

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::standard);

/// The shared catalog of all managed entities
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

// ============================================================================
// Catalog
// ============================================================================

/// Ordered collection of entity schemas
#[derive(Debug, Clone)]
pub struct Catalog {
    entities: Vec<EntitySchema>,
}

impl Catalog {
    /// Build a catalog from schemas
    pub fn new(entities: Vec<EntitySchema>) -> Self {
        Self { entities }
    }

    /// The dashboard's entities
    pub fn standard() -> Self {
        Self::new(vec![
            cuentas(),
            roles(),
            bitacora(),
            residentes(),
            residencias(),
            vehiculos(),
            mascotas(),
            visitantes(),
            personal(),
            tareas(),
            areas(),
            reglas(),
            horarios(),
        ])
    }

    /// Get a schema by name
    pub fn get(&self, name: &str) -> AdminResult<&EntitySchema> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AdminError::EntityNotFound(name.to_string()))
    }

    /// Iterate over all schemas
    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.entities.iter()
    }

    /// Names of all schemas
    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }
}

impl Validatable for Catalog {
    fn validate(&self) -> AdminResult<()> {
        for entity in &self.entities {
            entity.validate()?;
        }
        for group in MENU {
            for item in group.items {
                self.get(item.entity)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Menu
// ============================================================================

/// A sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    /// Catalog key of the page
    pub entity: &'static str,
}

/// A collapsible sidebar group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGroup {
    pub title: &'static str,
    pub icon: &'static str,
    pub items: &'static [MenuItem],
}

/// Sidebar navigation
pub const MENU: &[MenuGroup] = &[
    MenuGroup {
        title: "Accesos",
        icon: "🔑",
        items: &[
            MenuItem { label: "Cuentas", entity: "cuentas" },
            MenuItem { label: "Roles", entity: "roles" },
            MenuItem { label: "Bitacora", entity: "bitacora" },
        ],
    },
    MenuGroup {
        title: "Comunidad",
        icon: "🏢",
        items: &[
            MenuItem { label: "Residentes", entity: "residentes" },
            MenuItem { label: "Residencias", entity: "residencias" },
            MenuItem { label: "Vehículos", entity: "vehiculos" },
            MenuItem { label: "Mascotas", entity: "mascotas" },
            MenuItem { label: "Visitantes", entity: "visitantes" },
        ],
    },
    MenuGroup {
        title: "Personal",
        icon: "👷",
        items: &[
            MenuItem { label: "Personal", entity: "personal" },
            MenuItem { label: "Tareas", entity: "tareas" },
        ],
    },
    MenuGroup {
        title: "Áreas y Servicios",
        icon: "🛠️",
        items: &[
            MenuItem { label: "Áreas Comunes", entity: "areas" },
            MenuItem { label: "Reglas", entity: "reglas" },
            MenuItem { label: "Horarios", entity: "horarios" },
        ],
    },
];

// ============================================================================
// Shared pieces
// ============================================================================

const RESIDENT_LABEL: &str = "{nombre} {apellidos} - Res. {residencia}";

fn residentes_source(label: &str) -> ReferenceSource {
    ReferenceSource::new("residentes", "/api/residentes/", label)
}

fn id_column(width: &str) -> ColumnDef {
    ColumnDef::new("id", "ID").width(width).sortable()
}

fn sorted(key: &str, label: &str) -> ColumnDef {
    ColumnDef::new(key, label).sortable()
}

fn active_flag() -> FieldSchema {
    FieldSchema::flag("activo", "Activo").with_default(true)
}

// ============================================================================
// Accesos
// ============================================================================

fn cuentas() -> EntitySchema {
    EntitySchema::new("cuentas", "Usuarios", "/api/cuenta/usuarios/")
        .singular("usuario")
        .display("{correo}")
        .field(FieldSchema::email("correo", "Correo").required())
        .field(
            FieldSchema::password("password", "Password")
                .required_on_create()
                .omit_blank_on_edit(),
        )
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::text("apellido", "Apellido").required())
        .field(FieldSchema::text("telefono", "Teléfono"))
        .field(
            FieldSchema::reference("rol_id", "Rol", "roles")
                .initial_from("rol.id")
                .initial_from("rol_id")
                .with_placeholder("(Sin rol)"),
        )
        .field(
            FieldSchema::reference("residente", "Residente", "residentes")
                .clears("personal")
                .with_placeholder("(Sin residente)"),
        )
        .field(
            FieldSchema::reference("personal", "Personal", "personal")
                .clears("residente")
                .with_placeholder("(Sin personal)"),
        )
        .field(FieldSchema::flag("is_active", "Activo").with_default(true))
        .reference(ReferenceSource::new("roles", "/api/cuenta/roles/", "{nombre}"))
        .reference(residentes_source(
            "{nombre} {apellidos} - Residencia {residencia}",
        ))
        .reference(ReferenceSource::new(
            "personal",
            "/api/personal/",
            "{nombre} - {puesto}",
        ))
        .column(id_column("70px"))
        .column(sorted("nombre", "Nombre"))
        .column(sorted("correo", "Correo"))
        .column(
            ColumnDef::new("rol", "Rol")
                .from_path("rol.nombre")
                .hide_below(Breakpoint::Md),
        )
        .column(
            ColumnDef::new("last_login", "Último Acceso")
                .format(CellFormat::DateTime)
                .hide_below(Breakpoint::Sm),
        )
        .column(
            ColumnDef::new("activo", "Estado")
                .from_path("is_active")
                .format(CellFormat::badge("Activo", "Inactivo")),
        )
}

fn roles() -> EntitySchema {
    EntitySchema::new("roles", "Roles", "/api/cuenta/roles/")
        .singular("rol")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .column(id_column("70px"))
        .column(sorted("nombre", "Nombre"))
}

fn bitacora() -> EntitySchema {
    EntitySchema::new("bitacora", "Bitácora", "/api/cuenta/bitacora/")
        .singular("registro")
        .display("{accion}")
        .read_only()
        .column(id_column("60px"))
        .column(sorted("accion", "Acción"))
        .column(sorted("descripcion", "Descripción"))
        .column(sorted("ip", "IP"))
        .column(sorted("usuario", "Usuario").from_path("usuario_correo"))
        .column(sorted("fecha", "Fecha").format(CellFormat::DateTime))
}

// ============================================================================
// Comunidad
// ============================================================================

fn residentes() -> EntitySchema {
    EntitySchema::new("residentes", "Residentes", "/api/residentes/")
        .singular("residente")
        .display("{nombre} {apellidos}")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::text("apellidos", "Apellidos").required())
        .field(FieldSchema::date("fecha_nacimiento", "Fecha de nacimiento"))
        .field(FieldSchema::text("telefono", "Teléfono"))
        .field(FieldSchema::email("correo", "Correo"))
        .field(FieldSchema::text("dni", "DNI").required())
        .field(
            FieldSchema::select_labelled(
                "sexo",
                "Sexo",
                vec![
                    SelectOption::new("M", "Masculino"),
                    SelectOption::new("F", "Femenino"),
                ],
            )
            .required(),
        )
        .field(
            FieldSchema::select_labelled(
                "tipo",
                "Tipo",
                vec![
                    SelectOption::new("PROPIETARIO", "Propietario"),
                    SelectOption::new("INQUILINO", "Inquilino"),
                    SelectOption::new("HABITANTE", "Habitante"),
                ],
            )
            .required(),
        )
        .field(FieldSchema::text("residencia", "Residencia"))
        .field(active_flag())
        .column(id_column("70px"))
        .column(sorted("nombre", "Nombre"))
        .column(sorted("apellidos", "Apellidos"))
        .column(sorted("dni", "DNI"))
        .column(sorted("tipo", "Tipo"))
        .column(sorted("sexo", "Sexo"))
        .column(sorted("residencia", "Residencia"))
        .column(ColumnDef::new("activo", "Activo").format(CellFormat::badge("Activo", "Inactivo")))
}

fn residencias() -> EntitySchema {
    EntitySchema::new("residencias", "Residencias", "/api/residencias/")
        .singular("residencia")
        .id_key("numero")
        .display("{numero}")
        .field(FieldSchema::integer("numero", "Número").required())
        .field(FieldSchema::text("direccion", "Dirección").required())
        .field(
            FieldSchema::select_labelled(
                "tipo",
                "Tipo",
                vec![
                    SelectOption::new("APARTAMENTO", "Apartamento"),
                    SelectOption::new("CASA", "Casa"),
                ],
            )
            .required(),
        )
        .field(FieldSchema::integer("num_habitaciones", "Habitaciones").with_default("1"))
        .field(FieldSchema::integer("num_residentes", "Residentes").with_default("0"))
        .column(sorted("numero", "Número").width("100px"))
        .column(sorted("direccion", "Dirección"))
        .column(sorted("tipo", "Tipo"))
        .column(sorted("num_habitaciones", "Habitaciones").width("120px"))
        .column(sorted("num_residentes", "Residentes").width("120px"))
}

fn vehiculos() -> EntitySchema {
    EntitySchema::new("vehiculos", "Vehículos", "/api/vehiculos/")
        .singular("vehículo")
        .display("{marca} {matricula}")
        .field(FieldSchema::text("marca", "Marca").required())
        .field(FieldSchema::text("modelo", "Modelo"))
        .field(FieldSchema::text("matricula", "Matrícula"))
        .field(FieldSchema::text("color", "Color"))
        .field(FieldSchema::select_labelled(
            "tipo",
            "Tipo",
            vec![
                SelectOption::new("COCHE", "Coche"),
                SelectOption::new("MOTO", "Moto"),
                SelectOption::new("BICICLETA", "Bicicleta"),
                SelectOption::new("OTRO", "Otro"),
            ],
        ))
        .field(
            FieldSchema::reference("residente", "Residente", "residentes")
                .required()
                .with_placeholder("Seleccionar residente"),
        )
        .reference(residentes_source(RESIDENT_LABEL))
        .column(id_column("70px"))
        .column(sorted("marca", "Marca"))
        .column(sorted("modelo", "Modelo"))
        .column(sorted("matricula", "Matrícula"))
        .column(sorted("color", "Color"))
        .column(sorted("tipo", "Tipo"))
}

fn mascotas() -> EntitySchema {
    EntitySchema::new("mascotas", "Mascotas", "/api/mascotas/")
        .singular("mascota")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(
            FieldSchema::select_labelled(
                "tipo",
                "Tipo",
                vec![
                    SelectOption::new("PERRO", "Perro"),
                    SelectOption::new("GATO", "Gato"),
                    SelectOption::new("OTRO", "Otro"),
                ],
            )
            .required(),
        )
        .field(FieldSchema::text("raza", "Raza"))
        .field(
            FieldSchema::reference("residente", "Residente", "residentes")
                .required()
                .with_placeholder("Seleccionar residente"),
        )
        .reference(residentes_source(RESIDENT_LABEL))
        .column(id_column("70px"))
        .column(sorted("nombre", "Nombre"))
        .column(sorted("tipo", "Tipo"))
        .column(sorted("raza", "Raza"))
}

fn visitantes() -> EntitySchema {
    EntitySchema::new("visitantes", "Visitantes", "/api/visitantes/")
        .singular("visitante")
        .display("{nombre} {apellidos}")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::text("apellidos", "Apellidos").required())
        .field(FieldSchema::text("dni", "DNI").required())
        .field(FieldSchema::text("telefono", "Teléfono"))
        .field(
            FieldSchema::reference("residente", "Residente", "residentes")
                .required()
                .with_placeholder("Seleccionar residente"),
        )
        .field(FieldSchema::datetime("hora_entrada", "Hora de entrada"))
        .field(FieldSchema::datetime("hora_salida", "Hora de salida"))
        .reference(residentes_source(RESIDENT_LABEL))
        .column(id_column("70px"))
        .column(sorted("nombre_completo", "Nombre Completo").from_template("{nombre} {apellidos}"))
        .column(sorted("dni", "DNI"))
        .column(sorted("telefono", "Teléfono"))
        .column(sorted("fecha_visita", "Fecha Visita").format(CellFormat::DateTime))
        .column(sorted("hora_entrada", "Entrada").format(CellFormat::DateTime))
        .column(sorted("hora_salida", "Salida").format(CellFormat::DateTime))
}

// ============================================================================
// Personal
// ============================================================================

fn personal() -> EntitySchema {
    EntitySchema::new("personal", "Personal", "/api/personal/")
        .singular("empleado")
        .display("{nombre} {apellido}")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::text("apellido", "Apellido").required())
        .field(FieldSchema::text("dni", "DNI").required())
        .field(FieldSchema::date("fecha_nacimiento", "Fecha de nacimiento"))
        .field(FieldSchema::text("telefono", "Teléfono"))
        .field(FieldSchema::email("correo", "Correo"))
        .field(FieldSchema::text("direccion", "Dirección"))
        .field(FieldSchema::date("fecha_contratacion", "Fecha de contratación"))
        .field(FieldSchema::select(
            "puesto",
            "Puesto",
            &[
                "ADMINISTRADOR",
                "SUPERVISOR",
                "MANTENIMIENTO",
                "SEGURIDAD",
                "LIMPIEZA",
                "OTRO",
            ],
        ))
        .field(active_flag())
        .field(FieldSchema::date("fecha_salida", "Fecha de salida"))
        .field(FieldSchema::text("estado", "Estado").with_default("ACTIVO"))
        .column(id_column("60px"))
        .column(sorted("nombre", "Nombre"))
        .column(sorted("apellido", "Apellido"))
        .column(sorted("dni", "DNI"))
        .column(ColumnDef::new("puesto", "Puesto"))
        .column(ColumnDef::new("estado", "Estado"))
        .column(
            ColumnDef::new("activo", "Activo")
                .width("80px")
                .format(CellFormat::badge("Sí", "No")),
        )
}

fn tareas() -> EntitySchema {
    EntitySchema::new("tareas", "Tareas", "/api/tareas/")
        .singular("tarea")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::textarea("descripcion", "Descripción"))
        .field(FieldSchema::date("fecha_asignacion", "Fecha de asignación"))
        .field(FieldSchema::date("fecha_vencimiento", "Fecha de vencimiento"))
        .field(
            FieldSchema::reference("personal_id", "Personal", "personal")
                .required()
                .initial_from("personal_id")
                .initial_from("personal")
                .with_placeholder("Selecciona"),
        )
        .field(
            FieldSchema::select("estado", "Estado", &["PENDIENTE", "PROGRESO", "COMPLETADO"])
                .with_default("PENDIENTE"),
        )
        .reference(ReferenceSource::new(
            "personal",
            "/api/personal/",
            "{nombre} {apellido}",
        ))
        .column(id_column("60px"))
        .column(sorted("nombre", "Nombre"))
        .column(sorted("personal", "Personal").from_template("{personal_nombre} {personal_apellido}"))
        .column(ColumnDef::new("estado", "Estado"))
        .column(ColumnDef::new("fecha_asignacion", "Asignada").format(CellFormat::Date))
        .column(ColumnDef::new("fecha_vencimiento", "Vence").format(CellFormat::Date))
}

// ============================================================================
// Áreas y Servicios
// ============================================================================

fn areas() -> EntitySchema {
    EntitySchema::new("areas", "Áreas Comunes", "/api/areas-comunes/")
        .singular("área")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::textarea("descripcion", "Descripción"))
        .field(active_flag())
        .field(FieldSchema::flag("requiere_reserva", "Requiere reserva"))
        .field(FieldSchema::integer("capacidad_maxima", "Capacidad máxima"))
        .field(FieldSchema::decimal("costo_reserva", "Costo de reserva"))
        .field(FieldSchema::integer("tiempo_reserva_minima", "Tiempo mínimo (Hr)"))
        .field(FieldSchema::integer("tiempo_reserva_maxima", "Tiempo máximo (Hr)"))
        .field(
            FieldSchema::select_labelled(
                "estado",
                "Estado",
                vec![
                    SelectOption::new("disponible", "Disponible"),
                    SelectOption::new("mantenimiento", "En Mantenimiento"),
                    SelectOption::new("cerrado", "Cerrado"),
                ],
            )
            .with_default("disponible"),
        )
        .field(
            FieldSchema::multi_reference("reglas", "Reglas", "reglas")
                .initial_from("reglas[].id")
                .detached(),
        )
        .reference(ReferenceSource::new("reglas", "/api/reglas/", "{nombre}"))
        .assign_related("asignar-reglas", "reglas")
        .column(id_column("60px"))
        .column(sorted("nombre", "Nombre"))
        .column(
            ColumnDef::new("conReserva", "Reserva")
                .from_path("requiere_reserva")
                .width("90px")
                .format(CellFormat::YesNo),
        )
        .column(
            ColumnDef::new("capacidadMaxima", "Capacidad")
                .from_path("capacidad_maxima")
                .width("90px"),
        )
        .column(
            ColumnDef::new("costoReserva", "Costo Reserva")
                .from_path("costo_reserva")
                .width("110px")
                .format(CellFormat::Money),
        )
        .column(
            ColumnDef::new("tiempoReservaMinima", "Tiempo Mínimo")
                .from_path("tiempo_reserva_minima")
                .width("110px")
                .format(CellFormat::Suffix("Hr".into())),
        )
        .column(
            ColumnDef::new("tiempoReservaMaxima", "Tiempo Máximo")
                .from_path("tiempo_reserva_maxima")
                .width("110px")
                .format(CellFormat::Suffix("Hr".into())),
        )
        .column(sorted("estado", "Estado"))
        .column(
            ColumnDef::new("activo", "Activo")
                .width("100px")
                .format(CellFormat::badge("si", "no")),
        )
}

fn reglas() -> EntitySchema {
    EntitySchema::new("reglas", "Reglas", "/api/reglas/")
        .singular("regla")
        .field(FieldSchema::text("nombre", "Nombre").required())
        .field(FieldSchema::textarea("descripcion", "Descripción"))
        .field(active_flag())
        .field(
            FieldSchema::multi_reference("areas_ids", "Áreas", "areas")
                .initial_from("areas_ids")
                .initial_from("areas[].id"),
        )
        .reference(ReferenceSource::new(
            "areas",
            "/api/areas-comunes/",
            "{nombre}",
        ))
        .column(id_column("60px"))
        .column(sorted("nombre", "Nombre"))
        .column(ColumnDef::new("descripcion", "Descripción").hide_below(Breakpoint::Md))
        .column(
            ColumnDef::new("asignadas", "Áreas")
                .count_of("areas_ids")
                .width("90px"),
        )
        .column(
            ColumnDef::new("activo", "Estado")
                .width("100px")
                .format(CellFormat::badge("Activa", "Inactiva")),
        )
}

/// Days accepted by schedules, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

fn horarios() -> EntitySchema {
    EntitySchema::new("horarios", "Horarios", "/api/horarios/")
        .singular("horario")
        .display("{area_nombre} {dia_semana}")
        .field(
            FieldSchema::reference("area", "Área", "areas")
                .required()
                .with_placeholder("Seleccionar área"),
        )
        .field(FieldSchema::select("dia_semana", "Día", &WEEKDAYS).required())
        .field(FieldSchema::time("hora_apertura", "Hora de apertura").required())
        .field(FieldSchema::time("hora_cierre", "Hora de cierre").required())
        .field(active_flag())
        .rule(FormRule::Before {
            earlier: "hora_apertura".into(),
            later: "hora_cierre".into(),
            message: "La hora de cierre debe ser posterior a la de apertura".into(),
        })
        .reference(ReferenceSource::new(
            "areas",
            "/api/areas-comunes/",
            "{nombre}",
        ))
        .column(id_column("70px"))
        .column(sorted("area", "Área").from_path("area_nombre"))
        .column(sorted("dia_semana", "Día"))
        .column(sorted("hora_apertura", "Apertura"))
        .column(sorted("hora_cierre", "Cierre"))
        .column(sorted("activo", "Activo").format(CellFormat::YesNo))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = catalog();
        catalog.validate().unwrap();
        assert_eq!(catalog.names().len(), 13);
    }

    #[test]
    fn test_unknown_entity() {
        let err = catalog().get("pagos").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_menu_covers_catalog() {
        let mut menu: Vec<&str> = MENU
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.entity))
            .collect();
        let mut names = catalog().names();
        menu.sort_unstable();
        names.sort_unstable();
        assert_eq!(menu, names);
    }

    #[test]
    fn test_only_audit_log_is_read_only() {
        let read_only: Vec<&str> = catalog()
            .iter()
            .filter(|e| e.read_only)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(read_only, vec!["bitacora"]);
    }

    #[test]
    fn test_residencias_keyed_by_numero() {
        let schema = catalog().get("residencias").unwrap();
        assert_eq!(schema.id_key, "numero");
        assert_eq!(schema.item_path(12), "/api/residencias/12/");
    }
}
