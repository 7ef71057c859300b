//! Barrido periódico de holds vencidos
//!
//! Tarea de fondo con ciclo de vida explícito: `start` la lanza y devuelve un
//! `SweeperHandle`; `SweeperHandle::shutdown` la detiene y espera a que acabe.
//! Un tick fallido se registra y el siguiente reintenta desde cero.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::repositories::VehicleStore;
use crate::utils::errors::AppResult;

pub struct ExpirySweeper {
    store: Arc<dyn VehicleStore>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn VehicleStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Una pasada del barrido
    pub async fn run_once(&self) -> AppResult<Vec<Uuid>> {
        self.store.release_expired_holds(Utc::now()).await
    }

    async fn tick(&self) {
        match self.run_once().await {
            Ok(released) if released.is_empty() => debug!("🔍 Barrido: ningún hold vencido"),
            Ok(released) => info!(
                "⏰ Barrido: {} vehículo(s) liberados: {:?}",
                released.len(),
                released
            ),
            Err(e) => error!("❌ Error en el barrido de reservas vencidas: {}", e),
        }
    }

    /// Lanzar la tarea periódica. El primer tick es inmediato.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!("🧹 Barrido de holds iniciado (cada {:?})", self.interval);
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.tick().await,
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("🛑 Barrido de holds detenido");
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle de la tarea de barrido
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Detener el barrido y esperar a que la tarea termine
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("❌ La tarea de barrido terminó con error: {}", e);
        }
    }
}
