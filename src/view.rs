use thiserror::Error;

/// Errors raised while handling one user interaction.
#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("unknown view '{0}'")]
    UnknownView(String),

    #[error("invalid price range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
}

/// The six chart views offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    PriceByTypeHistogram,
    MeanPriceByType,
    MeanPriceByPlace,
    PriceByPlaceHistogram,
    SurfaceVsPrice,
    SurfaceVsPricePerM2,
}

impl ViewKind {
    /// Menu order.
    pub const ALL: [ViewKind; 6] = [
        ViewKind::PriceByTypeHistogram,
        ViewKind::MeanPriceByType,
        ViewKind::MeanPriceByPlace,
        ViewKind::PriceByPlaceHistogram,
        ViewKind::SurfaceVsPrice,
        ViewKind::SurfaceVsPricePerM2,
    ];

    /// Stable 1-based identifier.
    pub fn id(self) -> u8 {
        match self {
            ViewKind::PriceByTypeHistogram => 1,
            ViewKind::MeanPriceByType => 2,
            ViewKind::MeanPriceByPlace => 3,
            ViewKind::PriceByPlaceHistogram => 4,
            ViewKind::SurfaceVsPrice => 5,
            ViewKind::SurfaceVsPricePerM2 => 6,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, ViewError> {
        Self::ALL
            .into_iter()
            .find(|v| v.id() == id)
            .ok_or_else(|| ViewError::UnknownView(id.to_string()))
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::PriceByTypeHistogram => "Distribución de Precios por Tipo de Vivienda",
            ViewKind::MeanPriceByType => "Precio Promedio por Tipo de Vivienda",
            ViewKind::MeanPriceByPlace => "Precio Promedio por Delegación",
            ViewKind::PriceByPlaceHistogram => "Distribución de Precios por Delegación",
            ViewKind::SurfaceVsPrice => "Relación entre Superficie Total y Precio",
            ViewKind::SurfaceVsPricePerM2 => {
                "Relación entre Superficie Total y Precio por Metro Cuadrado"
            }
        }
    }

    pub fn from_label(label: &str) -> Result<Self, ViewError> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == label)
            .ok_or_else(|| ViewError::UnknownView(label.to_string()))
    }

    /// Resolve a selection given either as the numeric id or the menu label.
    pub fn select(selection: &str) -> Result<Self, ViewError> {
        let selection = selection.trim();
        match selection.parse::<u8>() {
            Ok(id) => Self::from_id(id),
            Err(_) => Self::from_label(selection),
        }
    }

    /// Whether the view is filtered by the price sliders.
    pub fn uses_price_range(self) -> bool {
        matches!(
            self,
            ViewKind::PriceByTypeHistogram | ViewKind::PriceByPlaceHistogram
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_ids_resolve_back() {
        for view in ViewKind::ALL {
            assert_eq!(ViewKind::from_label(view.label()), Ok(view));
            assert_eq!(ViewKind::from_id(view.id()), Ok(view));
        }
        let ids: Vec<u8> = ViewKind::ALL.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unknown_selection_is_rejected() {
        assert_eq!(
            ViewKind::from_label("Mapa de calor"),
            Err(ViewError::UnknownView("Mapa de calor".into()))
        );
        assert!(ViewKind::from_id(7).is_err());
        assert!(ViewKind::from_id(0).is_err());
    }

    #[test]
    fn selection_accepts_ids_and_labels() {
        assert_eq!(ViewKind::select("3"), Ok(ViewKind::MeanPriceByPlace));
        assert_eq!(
            ViewKind::select(" Relación entre Superficie Total y Precio "),
            Ok(ViewKind::SurfaceVsPrice)
        );
        assert_eq!(ViewKind::select("9"), Err(ViewError::UnknownView("9".into())));
        assert!(ViewKind::select("Mapa").is_err());
    }

    #[test]
    fn only_histograms_take_a_price_range() {
        let ranged: Vec<u8> = ViewKind::ALL
            .iter()
            .filter(|v| v.uses_price_range())
            .map(|v| v.id())
            .collect();
        assert_eq!(ranged, vec![1, 4]);
    }
}
